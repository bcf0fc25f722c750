//! Bind variable dialects.
//!
//! A [`BindVar`] maps a zero-based argument slot to the textual
//! bind-variable token a particular SQL engine expects. Rendering takes the
//! dialect as an argument, so one composed query can be rendered for several
//! engines.

use std::fmt::Write;

/// Rule mapping a zero-based argument slot to its bind-variable token.
pub trait BindVar {
    /// Write the token for `slot` into `out`.
    fn write_bind_var(&self, slot: usize, out: &mut String);

    /// The token for `slot` as an owned string.
    fn bind_var(&self, slot: usize) -> String {
        let mut out = String::new();
        self.write_bind_var(slot, &mut out);
        out
    }
}

/// Numbered placeholders: `$1, $2, ...` (PostgreSQL).
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresBindVar;

impl BindVar for PostgresBindVar {
    fn write_bind_var(&self, slot: usize, out: &mut String) {
        let _ = write!(out, "${}", slot + 1);
    }
}

/// A fixed `?` placeholder repeated for every slot (MySQL, SQLite).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleBindVar;

impl BindVar for SimpleBindVar {
    fn write_bind_var(&self, _slot: usize, out: &mut String) {
        out.push('?');
    }
}

impl<F: Fn(usize) -> String> BindVar for F {
    fn write_bind_var(&self, slot: usize, out: &mut String) {
        out.push_str(&self(slot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_tokens_are_one_based() {
        assert_eq!(PostgresBindVar.bind_var(0), "$1");
        assert_eq!(PostgresBindVar.bind_var(11), "$12");
    }

    #[test]
    fn simple_token_is_constant() {
        assert_eq!(SimpleBindVar.bind_var(0), "?");
        assert_eq!(SimpleBindVar.bind_var(7), "?");
    }

    #[test]
    fn closures_are_bind_vars() {
        let named = |slot: usize| format!(":p{}", slot + 1);
        assert_eq!(named.bind_var(2), ":p3");
    }
}
