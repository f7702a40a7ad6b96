//! Tests for template-based definitions: defaults, inheritance, overrides

use std::sync::LazyLock;
use std::thread;

use mobject::util::testing;
use mobject::{mob, Callable, DomainResult, MObject, Scalar, Template, Value};

fn set_c() -> Callable {
    Callable::method(["x"], |this, args| {
        this.set("c", args[0].clone())?;
        Ok(Value::none())
    })
}

fn append_d() -> Callable {
    Callable::method(["x"], |this, args| {
        let item = args[0].clone().into_scalar()?;
        this.list_mut("d")?.push(item);
        Ok(Value::none())
    })
}

fn add_to_c() -> Callable {
    Callable::method(["x"], |this, args| {
        Ok(Value::from(this.int("c")? + args[0].to_int()?))
    })
}

static TEST_MOBJECT: LazyLock<Template> = LazyLock::new(|| {
    Template::builder("TestMObject")
        .set("a", 1)
        .set("b__c", 2)
        .set("b__d", Vec::<i64>::new())
        .set("b__f", add_to_c())
        .set("b__set_c", set_c())
        .set("b__append_d", append_d())
        .build()
});

static INHERITED_TEST_MOBJECT: LazyLock<Template> = LazyLock::new(|| {
    Template::builder("InheritedTestMObject")
        .extends(&TEST_MOBJECT)
        .set("foo", 3)
        .set("a", 4)
        .build()
});

static NESTED_TEST_MOBJECT: LazyLock<Template> = LazyLock::new(|| {
    let bb = Template::builder("bb").set("cc", 22).build();
    Template::builder("NestedTestMObject")
        .set("aa", 11)
        .set("bb", bb)
        .build()
});

static MULTI_INHERITED_TEST_MOBJECT: LazyLock<Template> = LazyLock::new(|| {
    Template::builder("MultiInheritedTestMObject")
        .extends(&TEST_MOBJECT)
        .extends(&NESTED_TEST_MOBJECT)
        .set("aaa", 111)
        .build()
});

#[test]
fn given_template_when_displayed_then_lists_sorted_descriptors() {
    testing::init_test_setup();

    // Act
    let o = TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(
        o.to_string(),
        "TestMObject(a=1, b__append_d(self, x), b__c=2, b__d=[], b__f(self, x), b__set_c(self, x))"
    );
}

#[test]
fn given_template_when_instantiated_then_has_defaults() {
    // Act
    let o = TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(o.int("a").unwrap(), 1);
    assert_eq!(o.int("b__c").unwrap(), 2);
    assert_eq!(o.kind(), "TestMObject");
}

#[test]
fn given_instance_when_mutated_through_methods_then_other_instances_unaffected() {
    // Arrange
    let mut o = TEST_MOBJECT.new_instance().unwrap();

    // Act
    o.call("b__set_c", vec![3.into()]).unwrap();
    o.call("b__append_d", vec![4.into()]).unwrap();

    // Assert
    assert_eq!(o.int("b__c").unwrap(), 3);
    assert_eq!(*o.scalar("b__d").unwrap(), Scalar::from(vec![4]));

    let o2 = TEST_MOBJECT.new_instance().unwrap();
    assert_eq!(o2.int("b__c").unwrap(), 2);
    assert_eq!(*o2.scalar("b__d").unwrap(), Scalar::List(vec![]));
}

#[test]
fn given_template_method_when_called_then_receives_innermost_object() {
    // Arrange
    let mut o = TEST_MOBJECT.new_instance().unwrap();

    // Act
    let result = o.call("b__f", vec![5.into()]).unwrap();

    // Assert: b.c (2) + 5
    assert_eq!(result.to_int().unwrap(), 7);
}

#[test]
fn given_inherited_template_when_instantiated_then_merges_defaults() {
    // Act
    let o = INHERITED_TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(o.int("foo").unwrap(), 3);
    assert_eq!(o.int("a").unwrap(), 4);
    assert_eq!(o.int("b__c").unwrap(), 2);
    assert_eq!(INHERITED_TEST_MOBJECT.ancestors(), ["TestMObject".to_string()]);
}

#[test]
fn given_overrides_when_instantiated_then_overrides_win() {
    // Act
    let o = INHERITED_TEST_MOBJECT
        .instantiate([("a", 5), ("b__c", 6)])
        .unwrap();

    // Assert
    assert_eq!(o.int("foo").unwrap(), 3);
    assert_eq!(o.int("a").unwrap(), 5);
    assert_eq!(o.int("b__c").unwrap(), 6);
    assert_eq!(*o.scalar("b__d").unwrap(), Scalar::List(vec![]));
}

#[test]
fn given_nested_template_when_instantiated_then_builds_child_from_it() {
    // Act
    let o = NESTED_TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(o.int("aa").unwrap(), 11);
    assert_eq!(o.int("bb__cc").unwrap(), 22);
    assert_eq!(o.child("bb").unwrap().kind(), "bb");
}

#[test]
fn given_nested_template_when_overridden_by_flat_key_then_refines_child() {
    // Act
    let o = NESTED_TEST_MOBJECT.instantiate([("bb__cc", 33)]).unwrap();

    // Assert
    assert_eq!(o.int("bb__cc").unwrap(), 33);
    assert_eq!(o.child("bb").unwrap().kind(), "bb");
}

#[test]
fn given_multiple_parents_when_instantiated_then_has_all_defaults() {
    // Act
    let o = MULTI_INHERITED_TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(o.int("a").unwrap(), 1);
    assert_eq!(o.int("aa").unwrap(), 11);
    assert_eq!(o.int("aaa").unwrap(), 111);
    assert_eq!(o.int("bb__cc").unwrap(), 22);
}

#[test]
fn given_conflicting_override_when_instantiated_then_fails() {
    // Act: `a` is a plain default, nesting under it is a conflict
    let result = TEST_MOBJECT.instantiate([("a__x", 1)]);

    // Assert
    assert!(result.is_err());
}

#[test]
fn given_override_replacing_nested_default_with_value_when_instantiated_then_fails() {
    // Act: `b` holds nested defaults, a plain `b` collides with them
    let result = TEST_MOBJECT.instantiate([("b", 1)]);

    // Assert
    assert!(result.is_err());
}

#[test]
fn given_template_when_instantiated_on_threads_then_instances_are_independent() {
    // Act
    let results: Vec<DomainResult<MObject>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                s.spawn(move || -> DomainResult<MObject> {
                    let mut o = TEST_MOBJECT.new_instance()?;
                    o.call("b__append_d", vec![Value::from(i)])?;
                    Ok(o)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    // Assert
    for (i, result) in results.into_iter().enumerate() {
        let o = result.unwrap();
        assert_eq!(*o.scalar("b__d").unwrap(), Scalar::from(vec![i as i64]));
    }
}

#[test]
fn given_template_instance_when_compared_with_mob_then_kind_is_ignored() {
    // Act
    let o = NESTED_TEST_MOBJECT.new_instance().unwrap();

    // Assert
    assert_eq!(o, mob!(aa = 11, bb__cc = 22).unwrap());
}
