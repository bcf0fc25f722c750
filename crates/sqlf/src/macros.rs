//! Variadic front end for [`Query::compose`](crate::Query::compose).

/// Compose a [`Query`](crate::Query) from a printf-style template.
///
/// Arguments may be any `ToSql + Debug` value, or another `Query` to splice
/// in. To reference one query at several argument positions, pass clones:
/// clones share identity, so the nested argument block is bound once.
///
/// ```
/// use sqlf::{PostgresBindVar, sqlf};
///
/// let q = sqlf!("SELECT * FROM users WHERE country = %s AND age > %d", "US", 27)?;
/// assert_eq!(
///     q.to_sql(&PostgresBindVar),
///     "SELECT * FROM users WHERE country = $1 AND age > $2"
/// );
/// # Ok::<(), sqlf::SqlfError>(())
/// ```
#[macro_export]
macro_rules! sqlf {
    ($template:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::IntoArg as _;
        $crate::Query::compose($template, ::std::vec![$(($arg).into_arg()),*])
    }};
}
