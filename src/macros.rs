/// Build an [`MObject`](crate::MObject) from keyword-style declarations.
///
/// ```
/// use mobject::mob;
///
/// let o = mob!(a = 1, b__c = "x").unwrap();
/// assert_eq!(o.int("a").unwrap(), 1);
/// assert_eq!(o.to_string(), "MObject(a=1, b__c=x)");
///
/// // keys that are not identifiers
/// let o = mob!("a.b" => 1).unwrap();
/// assert!(o.get("a.b").is_some());
/// ```
#[macro_export]
macro_rules! mob {
    () => {
        $crate::MObject::build(::std::iter::empty::<(::std::string::String, $crate::Value)>())
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::MObject::build([
            $((::std::stringify!($key), $crate::Value::from($value))),+
        ])
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        $crate::MObject::build([
            $(($key, $crate::Value::from($value))),+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::{Attr, Callable, MObject};

    #[test]
    fn test_mob_matches_build() {
        let short = mob!(a = 1, b = 2).unwrap();
        let long = MObject::build([("a", 1), ("b", 2)]).unwrap();
        assert_eq!(short, long);
        assert_eq!(short.to_string(), long.to_string());
    }

    #[test]
    fn test_mob_empty() {
        assert!(mob!().unwrap().is_empty());
    }

    #[test]
    fn test_mob_accepts_callables_and_private_names() {
        let o = mob!(
            _hidden = true,
            f = Callable::function(["x"], |args| Ok(args[0].clone())),
        )
        .unwrap();
        assert_eq!(o.get("_hidden"), Some(&Attr::from(true)));
        assert!(o.get("f").unwrap().is_callable());
    }
}
