/// Builds a `Vec<Value>` from a list of expressions.
///
/// Each element goes through `Value::from`, so integer literals become
/// [`Value::Int`](crate::Value::Int), suffixed unsigned literals become
/// [`Value::UInt`](crate::Value::UInt), and strings or byte strings become
/// [`Value::Bytes`](crate::Value::Bytes).
///
/// ```rust
/// use finstruct::{values, Value};
///
/// let v = values![1, 2u16, 0.5, true, "hi"];
/// assert_eq!(v[0], Value::Int(1));
/// assert_eq!(v[1], Value::UInt(2));
/// assert_eq!(v[4], Value::Bytes(b"hi".to_vec()));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };

    ($($elem:expr),+ $(,)?) => {
        vec![$($crate::Value::from($elem)),+]
    };
}
