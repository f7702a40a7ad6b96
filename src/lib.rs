//! Lightweight construction of object trees for mocking and stubbing.
//!
//! Objects are built from flat key/value pairs. A double underscore in a key
//! creates a nested object, so `b__c` becomes attribute `c` of child `b`:
//!
//! ```
//! use mobject::{mob, Callable, Value};
//!
//! let mut order = mob!(
//!     id = 7,
//!     customer__name = "Ada",
//!     customer__rename = Callable::method(["name"], |this, args| {
//!         this.set("name", args[0].clone())?;
//!         Ok(Value::none())
//!     }),
//! )
//! .unwrap();
//!
//! order.call("customer__rename", vec!["Grace".into()]).unwrap();
//! assert_eq!(*order.scalar("customer__name").unwrap(), "Grace");
//! assert_eq!(
//!     order.to_string(),
//!     "MObject(customer__name=Grace, customer__rename(self, name), id=7)"
//! );
//! ```
//!
//! Reusable shapes are declared as [`Template`]s whose defaults can be
//! inherited and overridden. Objects compare structurally with anything that
//! implements [`Inspect`]: `==` needs the same attribute names and equal
//! values, `<` and `>` allow one side to have extra attributes.

mod macros;

pub mod builder;
pub mod compare;
pub mod config;
pub mod display;
pub mod domain;
pub mod util;

pub use builder::TreeBuilder;
pub use compare::{structural_cmp, structural_match, Field, Inspect, SetRelation};
pub use config::{Settings, SettingsError, SettingsResult};
pub use domain::{
    Attr, Callable, DomainError, DomainResult, FlatKey, KeySyntax, MObject, Scalar, Template,
    TemplateBuilder, Value,
};
