//! Composed queries: flattening, deduplication, and rendering.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio_postgres::types::ToSql;

use crate::arg::{Arg, Param};
use crate::bindvar::BindVar;
use crate::directive::{Directive, parse_directives, resolve_indices};
use crate::error::SqlfResult;

/// A composed, immutable SQL template plus its flattened bind arguments.
///
/// Produced by [`Query::compose`] (usually via the [`sqlf!`](crate::sqlf)
/// macro) or by [`join`]. A `Query` never contains interpolated values:
/// render the text with [`Query::to_sql`] and pass it together with
/// [`Query::args_ref`] to the executing client, unmodified and paired.
///
/// Cloning is cheap (the representation is shared) and clones keep the same
/// identity, so a cloned query referenced at several placeholder positions
/// contributes its argument block exactly once.
#[derive(Clone)]
pub struct Query {
    inner: Arc<QueryInner>,
}

struct QueryInner {
    /// Normalized template: raw SQL, `%s` placeholder markers, and `%%`
    /// literal-percent escapes. All other printf decorations are gone.
    text: String,
    /// Flattened arguments, one entry per distinct referenced source slot.
    args: Vec<Param>,
    /// Placeholder occurrence -> argument slot, in source order. `None`
    /// means the identity mapping (placeholder i binds args\[i\]).
    arg_indices: Option<Vec<usize>>,
}

impl Query {
    /// Compose a query from a printf-style template and arguments.
    ///
    /// Each non-literal directive binds one argument by position, or by
    /// explicit `%[n]s` index. Arguments that are themselves queries are
    /// flattened in place. Fails with [`SqlfError::IndexOutOfRange`]
    /// (composition aborted, nothing partial returned) when a placeholder
    /// resolves outside the argument list.
    ///
    /// [`SqlfError::IndexOutOfRange`]: crate::SqlfError::IndexOutOfRange
    pub fn compose(template: &str, args: Vec<Arg>) -> SqlfResult<Query> {
        let directives = parse_directives(template);
        let resolved = resolve_indices(&directives, args.len())?;

        #[cfg(feature = "tracing")]
        tracing::trace!(template, arg_count = args.len(), "composing query");

        let inner = if needs_explicit_path(&directives, &args) {
            compose_explicit(template, &directives, &resolved, &args)
        } else {
            compose_identity(template, &directives, &args)
        };
        Ok(Query {
            inner: Arc::new(inner),
        })
    }

    /// Render the final query text, substituting each placeholder with the
    /// bind-variable token `bind_var` produces for its slot.
    ///
    /// Pure: rendering the same query twice, or concurrently with different
    /// dialects, yields identical results for each.
    pub fn to_sql(&self, bind_var: &impl BindVar) -> String {
        let text = self.inner.text.as_str();
        let mut out = String::with_capacity(text.len() + 4 * self.inner.args.len());
        let mut rest = text;
        let mut k = 0usize;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos + 1..];
            if let Some(t) = tail.strip_prefix('%') {
                out.push('%');
                rest = t;
            } else if let Some(t) = tail.strip_prefix('s') {
                let slot = match &self.inner.arg_indices {
                    Some(indices) => indices[k],
                    None => k,
                };
                bind_var.write_bind_var(slot, &mut out);
                k += 1;
                rest = t;
            } else {
                // Stray marker that survived scanning (a dangling trailing
                // `%` in the source template): keep it as literal text.
                out.push('%');
                rest = tail;
            }
        }
        out.push_str(rest);
        out
    }

    /// The flattened bind arguments, in slot order.
    ///
    /// Slot order matches the numbering [`Query::to_sql`] hands to the
    /// dialect, so `args()[0]` is `$1` under [`PostgresBindVar`].
    ///
    /// [`PostgresBindVar`]: crate::PostgresBindVar
    pub fn args(&self) -> &[Param] {
        &self.inner.args
    }

    /// Argument references compatible with `tokio-postgres` query methods.
    pub fn args_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.inner.args.iter().map(|p| p.as_ref()).collect()
    }

    /// Convert into an [`Arg`] for splicing into another template.
    ///
    /// Inherent rather than an [`IntoArg`](crate::IntoArg) impl so it takes
    /// precedence over the blanket leaf-value impl at macro call sites.
    pub fn into_arg(self) -> Arg {
        Arg::Query(self)
    }

    #[cfg(test)]
    pub(crate) fn text(&self) -> &str {
        &self.inner.text
    }

    #[cfg(test)]
    pub(crate) fn arg_indices(&self) -> Option<&[usize]> {
        self.inner.arg_indices.as_deref()
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("text", &self.inner.text)
            .field("args", &self.inner.args)
            .field("arg_indices", &self.inner.arg_indices)
            .finish()
    }
}

/// The identity path only works when placeholders map 1:1, in source order,
/// to arguments: no explicit indices anywhere, and no nested query carrying
/// its own placeholder mapping.
fn needs_explicit_path(directives: &[Directive], args: &[Arg]) -> bool {
    directives.iter().any(|d| d.explicit_index.is_some())
        || args
            .iter()
            .any(|a| matches!(a, Arg::Query(q) if q.inner.arg_indices.is_some()))
}

fn compose_identity(template: &str, directives: &[Directive], args: &[Arg]) -> QueryInner {
    let mut text = String::with_capacity(template.len());
    let mut out_args: Vec<Param> = Vec::with_capacity(args.len());
    let mut last = 0;
    let mut next = 0usize;
    for d in directives {
        text.push_str(&template[last..d.start]);
        last = d.end;
        if d.is_literal {
            text.push_str("%%");
            continue;
        }
        // resolve_indices checked the bounds already.
        match &args[next] {
            Arg::Value(p) => {
                text.push_str("%s");
                out_args.push(p.clone());
            }
            Arg::Query(q) => {
                // Nested text is already normalized; splice it verbatim and
                // take its arguments in their own order.
                text.push_str(&q.inner.text);
                out_args.extend(q.inner.args.iter().cloned());
            }
        }
        next += 1;
    }
    text.push_str(&template[last..]);
    QueryInner {
        text,
        args: out_args,
        arg_indices: None,
    }
}

/// A nested query already spliced into the output, cached for reuse.
struct NestedInfo {
    /// Offset in the output args where this query's block starts.
    offset: usize,
    /// The query's placeholder mapping, identity-normalized.
    indices: Vec<usize>,
}

fn compose_explicit(
    template: &str,
    directives: &[Directive],
    resolved: &[Option<usize>],
    args: &[Arg],
) -> QueryInner {
    let mut text = String::with_capacity(template.len());
    let mut out_args: Vec<Param> = Vec::with_capacity(args.len());
    let mut arg_indices: Vec<usize> = Vec::with_capacity(directives.len());

    // Source argument position -> output slot, for leaf values. Dedup is by
    // position: two equal values at different positions get separate slots.
    let mut leaf_slots: HashMap<usize, usize> = HashMap::new();
    // Nested queries already spliced, keyed by object identity. Scoped to
    // this one compose call.
    let mut nested: HashMap<*const QueryInner, NestedInfo> = HashMap::new();

    let mut last = 0;
    for (d, idx) in directives.iter().zip(resolved) {
        text.push_str(&template[last..d.start]);
        last = d.end;

        let Some(idx) = idx else {
            text.push_str("%%");
            continue;
        };

        match &args[*idx] {
            Arg::Value(p) => {
                text.push_str("%s");
                let slot = *leaf_slots.entry(*idx).or_insert_with(|| {
                    out_args.push(p.clone());
                    out_args.len() - 1
                });
                arg_indices.push(slot);
            }
            Arg::Query(q) => {
                text.push_str(&q.inner.text);
                let key = Arc::as_ptr(&q.inner);
                if let Some(info) = nested.get(&key) {
                    // Same object again: reuse the cached block, shifted.
                    arg_indices.extend(info.indices.iter().map(|i| info.offset + i));
                } else {
                    let offset = out_args.len();
                    let indices: Vec<usize> = match &q.inner.arg_indices {
                        Some(v) => v.clone(),
                        None => (0..q.inner.args.len()).collect(),
                    };
                    arg_indices.extend(indices.iter().map(|i| offset + i));
                    out_args.extend(q.inner.args.iter().cloned());
                    nested.insert(key, NestedInfo { offset, indices });
                }
            }
        }
    }
    text.push_str(&template[last..]);
    QueryInner {
        text,
        args: out_args,
        arg_indices: Some(arg_indices),
    }
}

/// Concatenate `queries` with ` {sep} ` between consecutive elements,
/// merging their argument arrays.
///
/// This is commonly used to join clauses in a WHERE query, so `sep` is
/// usually `"AND"` or `"OR"`. If any input carries an explicit placeholder
/// mapping, every input is normalized and the mappings are merged with the
/// right offsets; otherwise the result stays on the cheaper identity path.
pub fn join(queries: &[Query], sep: &str) -> Query {
    let has_explicit = queries.iter().any(|q| q.inner.arg_indices.is_some());

    let mut text = String::new();
    let mut args: Vec<Param> = Vec::new();
    let mut arg_indices: Vec<usize> = Vec::new();

    for (i, q) in queries.iter().enumerate() {
        if i > 0 {
            text.push(' ');
            text.push_str(sep);
            text.push(' ');
        }
        text.push_str(&q.inner.text);

        if has_explicit {
            let offset = args.len();
            match &q.inner.arg_indices {
                Some(v) => arg_indices.extend(v.iter().map(|idx| offset + idx)),
                None => arg_indices.extend((0..q.inner.args.len()).map(|idx| offset + idx)),
            }
        }
        args.extend(q.inner.args.iter().cloned());
    }

    Query {
        inner: Arc::new(QueryInner {
            text,
            args,
            arg_indices: has_explicit.then_some(arg_indices),
        }),
    }
}
