//! Import extraction: walk a Python module and collect imported module names
//! plus whether a `main` function exists anywhere in it.

use std::collections::BTreeSet;
use std::path::Path;

use rustpython_parser::{ast, Parse};

use crate::error::SlothxError;

/// Name of the function a script must define to be installable or runnable.
pub const ENTRY_POINT: &str = "main";

/// Dotted module names imported by a script. Sorted, duplicates collapsed.
pub type ImportSet = BTreeSet<String>;

/// Result of analyzing one script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAnalysis {
    pub imports: ImportSet,
    pub has_entry_point: bool,
}

/// Parse `source` and collect its imports and entry-point flag.
///
/// `path` is only used for error reporting.
pub fn extract(source: &str, path: &Path) -> Result<ScriptAnalysis, SlothxError> {
    let suite = ast::Suite::parse(source, &path.to_string_lossy()).map_err(|e| {
        SlothxError::Syntax {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let mut analysis = ScriptAnalysis::default();
    visit_body(&suite, &mut analysis);
    Ok(analysis)
}

fn visit_body(body: &[ast::Stmt], out: &mut ScriptAnalysis) {
    for stmt in body {
        visit_stmt(stmt, out);
    }
}

// Statements are the only nodes that can hold imports or defs, so descending
// through every statement body reaches the whole tree.
fn visit_stmt(stmt: &ast::Stmt, out: &mut ScriptAnalysis) {
    match stmt {
        ast::Stmt::Import(ast::StmtImport { names, .. }) => {
            for alias in names {
                out.imports.insert(alias.name.as_str().to_string());
            }
        }
        ast::Stmt::ImportFrom(ast::StmtImportFrom { module, .. }) => {
            // `from . import x` has no module to resolve
            if let Some(module) = module {
                out.imports.insert(module.as_str().to_string());
            }
        }
        ast::Stmt::FunctionDef(ast::StmtFunctionDef { name, body, .. }) => {
            if name.as_str() == ENTRY_POINT {
                out.has_entry_point = true;
            }
            visit_body(body, out);
        }
        ast::Stmt::AsyncFunctionDef(ast::StmtAsyncFunctionDef { body, .. }) => {
            visit_body(body, out);
        }
        ast::Stmt::ClassDef(ast::StmtClassDef { body, .. }) => visit_body(body, out),
        ast::Stmt::If(ast::StmtIf { body, orelse, .. })
        | ast::Stmt::While(ast::StmtWhile { body, orelse, .. })
        | ast::Stmt::For(ast::StmtFor { body, orelse, .. })
        | ast::Stmt::AsyncFor(ast::StmtAsyncFor { body, orelse, .. }) => {
            visit_body(body, out);
            visit_body(orelse, out);
        }
        ast::Stmt::With(ast::StmtWith { body, .. })
        | ast::Stmt::AsyncWith(ast::StmtAsyncWith { body, .. }) => visit_body(body, out),
        ast::Stmt::Try(ast::StmtTry {
            body,
            handlers,
            orelse,
            finalbody,
            ..
        })
        | ast::Stmt::TryStar(ast::StmtTryStar {
            body,
            handlers,
            orelse,
            finalbody,
            ..
        }) => {
            visit_body(body, out);
            for handler in handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                visit_body(&h.body, out);
            }
            visit_body(orelse, out);
            visit_body(finalbody, out);
        }
        ast::Stmt::Match(ast::StmtMatch { cases, .. }) => {
            for case in cases {
                visit_body(&case.body, out);
            }
        }
        _ => {}
    }
}

/// Python program that prints the same facts as [`extract`], one per line,
/// for the file named in `sys.argv[1]`: `import <module>` for every import
/// and `main` for every synchronous `def main`. Exits
/// [`LISTING_SYNTAX_EXIT`] with the message on stderr if the file does not
/// parse.
///
/// Used when the interpreter in use accepts syntax newer than the built-in
/// parser knows about.
pub const LISTING_PROGRAM: &str = r#"import ast, sys
path = sys.argv[1]
try:
    with open(path, "rb") as f:
        tree = ast.parse(f.read(), path)
except SyntaxError as e:
    print(e, file=sys.stderr)
    sys.exit(65)
for node in ast.walk(tree):
    if isinstance(node, ast.Import):
        for alias in node.names:
            print("import", alias.name)
    elif isinstance(node, ast.ImportFrom) and node.module:
        print("import", node.module)
    elif isinstance(node, ast.FunctionDef) and node.name == "main":
        print("main")
"#;

/// Exit code of [`LISTING_PROGRAM`] for source the interpreter rejects.
pub const LISTING_SYNTAX_EXIT: i32 = 65;

/// Read the output of [`LISTING_PROGRAM`]. Unknown lines are ignored.
pub fn from_listing(listing: &str) -> ScriptAnalysis {
    let mut analysis = ScriptAnalysis::default();
    for line in listing.lines().map(str::trim) {
        if line == ENTRY_POINT {
            analysis.has_entry_point = true;
        } else if let Some(module) = line.strip_prefix("import ") {
            analysis.imports.insert(module.trim().to_string());
        }
    }
    analysis
}

/// Top-level portion of a dotted module name: `a.b.c` -> `a`.
pub fn top_level(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}
