//! Convenience macros.

/// Build an [`Object`](crate::Object) from `key => value` pairs.
///
/// ```rust
/// use zepp_core::record;
///
/// let style = record! { "x" => 0, "y" => 80, "text" => "count: 0" };
/// assert_eq!(style.keys(), vec!["x", "y", "text"]);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Object::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let object = $crate::Object::new();
        $( object.set($key, $value); )+
        object
    }};
}
