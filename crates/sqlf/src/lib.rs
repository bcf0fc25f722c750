//! # sqlf
//!
//! Generate parameterized SQL statements, sprintf style.
//!
//! ```
//! use sqlf::{PostgresBindVar, sqlf};
//!
//! let country = "US";
//! let q = sqlf!("SELECT * FROM users WHERE country = %s AND age > %d", country, 27)?;
//!
//! // Hand both halves to the executing client together:
//! let text = q.to_sql(&PostgresBindVar);
//! let params = q.args_ref();
//! # assert_eq!(text, "SELECT * FROM users WHERE country = $1 AND age > $2");
//! # assert_eq!(params.len(), 2);
//! # Ok::<(), sqlf::SqlfError>(())
//! ```
//!
//! `sqlf!` does not return a string. It returns a [`Query`] holding the
//! template and its bind arguments separately, so values are never
//! interpolated into SQL text: no injection, no malformed SQL from stray
//! quoting.
//!
//! A [`Query`] can itself be passed as an argument to `sqlf!`. Its text is
//! flattened into the outer template while the bind mapping stays correct,
//! which makes composing subqueries and WHERE fragments straightforward:
//!
//! ```
//! use sqlf::{PostgresBindVar, join, sqlf};
//!
//! let inner = sqlf!("SELECT id FROM orgs WHERE name = %s", "acme")?;
//! let q = sqlf!("SELECT * FROM users WHERE org_id IN (%s) AND age > %d", inner, 21)?;
//! assert_eq!(
//!     q.to_sql(&PostgresBindVar),
//!     "SELECT * FROM users WHERE org_id IN (SELECT id FROM orgs WHERE name = $1) AND age > $2"
//! );
//!
//! let conds = vec![sqlf!("status = %s", "active")?, sqlf!("age > %d", 21)?];
//! let clause = join(&conds, "AND");
//! assert_eq!(clause.to_sql(&PostgresBindVar), "status = $1 AND age > $2");
//! # Ok::<(), sqlf::SqlfError>(())
//! ```
//!
//! Explicit printf indices (`%[1]s`) reference one argument from several
//! placeholders while binding it once:
//!
//! ```
//! use sqlf::{PostgresBindVar, sqlf};
//!
//! let q = sqlf!("UPDATE t SET a = %[1]s, b = %[1]s WHERE c = %s", "v", "w")?;
//! assert_eq!(q.to_sql(&PostgresBindVar), "UPDATE t SET a = $1, b = $1 WHERE c = $2");
//! assert_eq!(q.args().len(), 2);
//! # Ok::<(), sqlf::SqlfError>(())
//! ```
//!
//! Rendering is dialect-driven: [`PostgresBindVar`] numbers slots `$1, $2,
//! ...`, [`SimpleBindVar`] repeats `?`, and any `Fn(usize) -> String`
//! closure works as a custom [`BindVar`].

mod arg;
mod bindvar;
mod directive;
mod error;
mod macros;
mod query;

pub use arg::{Arg, ArgValue, IntoArg, Param};
pub use bindvar::{BindVar, PostgresBindVar, SimpleBindVar};
pub use error::{SqlfError, SqlfResult};
pub use query::{Query, join};
