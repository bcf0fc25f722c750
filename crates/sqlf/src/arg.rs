//! Argument storage: clone-friendly leaf values and nested queries.

use std::fmt;
use std::sync::Arc;

use tokio_postgres::types::ToSql;

use crate::query::Query;

/// A leaf bind value.
///
/// Object-safe bridge over [`ToSql`] that also requires `Debug`, so argument
/// arrays print their actual values in logs and test assertions.
pub trait ArgValue: fmt::Debug + Send + Sync {
    /// View the value as a `tokio-postgres` bind parameter.
    fn as_to_sql(&self) -> &(dyn ToSql + Sync);
}

impl<T: ToSql + fmt::Debug + Send + Sync> ArgValue for T {
    fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

/// A clone-friendly bind parameter wrapper using Arc.
///
/// Composed queries hand their flattened argument array around a lot
/// (rendering, joining, re-composition into outer templates); Arc keeps
/// those hand-offs free of value copies.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ArgValue>);

impl Param {
    /// Wrap any `ToSql + Debug` value.
    pub fn new<T: ArgValue + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference compatible with `tokio-postgres` query methods.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        self.0.as_to_sql()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// One argument to [`Query::compose`]: either a leaf bind value or a
/// previously composed query to splice in.
#[derive(Clone, Debug)]
pub enum Arg {
    /// Opaque leaf value, bound as a positional parameter.
    Value(Param),
    /// Nested query, flattened into the outer template at compose time.
    Query(Query),
}

/// Conversion into [`Arg`], used by the [`sqlf!`](crate::sqlf) macro.
///
/// Leaf values go through the blanket impl below. `Query` has an inherent
/// `into_arg` which takes precedence over this trait at method-call sites,
/// so the macro accepts both without annotation.
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

impl<T: ToSql + fmt::Debug + Send + Sync + 'static> IntoArg for T {
    fn into_arg(self) -> Arg {
        Arg::Value(Param::new(self))
    }
}
