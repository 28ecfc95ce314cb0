//! Configuration templates for `litq init`.
//!
//! The chosen mixing policy and backends are written as live settings. The
//! limits and extra spellings stay commented out beside the built-in operator
//! table and the backend list, so the file documents what can be changed.

use litq_backend::Backend;
use litq_query::{Limits, MixingPolicy, Operator, OperatorTable};

/// Header of a project `.litq.toml`.
const PROJECT_HEADER: &str = "\
# litq project configuration.
#
# Applies to this directory and below. The closest .litq.toml wins for each
# setting and the user configuration is read last.

# Uncomment to ignore parent directories and the user configuration.
# root = true
";

/// Header of the user configuration file.
const USER_HEADER: &str = "\
# litq user configuration.
#
# Applies everywhere unless a project .litq.toml sets the same value.
";

/// Commented examples of extra operator spellings.
const SPELLING_EXAMPLES: &str = "\
# and = [\"&\"]
# or = [\"|\"]
# not = [\"sans\"]
";

/// What `litq init` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Default backends, in order.
    pub backends: Vec<Backend>,
    /// Operator mixing policy.
    pub mixing: MixingPolicy,
    /// Whether this is the user file rather than a project file.
    pub user: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            backends: vec![Backend::PubMed],
            mixing: MixingPolicy::default(),
            user: false,
        }
    }
}

/// Renders a configuration file for `options`.
pub fn render_template(options: &TemplateOptions) -> String {
    let limits = Limits::default();
    let mut out = String::from(if options.user {
        USER_HEADER
    } else {
        PROJECT_HEADER
    });

    out.push_str("\n[parser]\n");
    out.push_str("# \"permissive\" lets NOT join next to AND or OR; \"strict\" forbids\n");
    out.push_str("# mixing any two operators at one level.\n");
    out.push_str(&format!("mixing = \"{}\"\n", options.mixing));
    out.push_str("# Maximum nesting depth of the canonical query.\n");
    out.push_str(&format!("# max_depth = {}\n", limits.max_depth));
    out.push_str("# Maximum tokens in one query line.\n");
    out.push_str(&format!("# max_tokens = {}\n", limits.max_tokens));

    out.push_str("\n[operators]\n");
    out.push_str("# Extra spellings, added to the built-in ones:\n");
    let table = OperatorTable::default();
    for op in Operator::ALL {
        let spellings = table.spellings(op).join(", ");
        out.push_str(&format!("#   {:<5} {spellings}\n", op.as_str()));
    }
    out.push_str(SPELLING_EXAMPLES);

    out.push_str("\n[compile]\n");
    out.push_str("# Backends compiled for when none is named on the command line:\n");
    for backend in Backend::ALL {
        out.push_str(&format!(
            "#   {:<10} {:<14} {}\n",
            backend.name(),
            backend.dialect().to_string(),
            backend.description()
        ));
    }
    let names = options
        .backends
        .iter()
        .map(|b| format!("\"{}\"", b.name()))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("backend = [{names}]\n"));
    out
}
