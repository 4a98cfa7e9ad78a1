//! Standard-library classification by probing a pristine environment.
//!
//! A name that imports inside a package-free venv belongs to the base
//! runtime; anything else must come from a third-party distribution. No
//! static stdlib list is kept, so the answer always matches the interpreter
//! actually in use.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use slothx_core::script::imports::top_level;

use crate::env::builder::EphemeralEnv;
use crate::runner::CommandRunner;

/// Return the third-party top-level names among `imports`.
///
/// Names are reduced to their first dotted segment and de-duplicated,
/// keeping the order of first appearance in `imports`. One environment
/// (without pip) is shared by all probes and removed on every return path;
/// each probe is its own interpreter process. Probes run in isolated mode
/// (`-I`), so `PYTHONPATH`, user site-packages and the current directory
/// cannot make a third-party module look importable.
pub fn classify<'a, I>(runner: &dyn CommandRunner, base_python: &Path, imports: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let candidates = top_level_names(imports);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut env = EphemeralEnv::create(runner, base_python, false)?;
    let mut third_party = Vec::new();
    for name in candidates {
        let probe = env.command(["-I".to_string(), "-c".to_string(), format!("import {}", name)]);
        if runner.probe(&probe)? {
            tracing::debug!("{} resolves in the base runtime", name);
        } else {
            tracing::debug!("{} is third-party", name);
            third_party.push(name);
        }
    }
    env.destroy()?;

    tracing::info!("Third-party imports: {:?}", third_party);
    Ok(third_party)
}

fn top_level_names<'a, I>(imports: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    imports
        .into_iter()
        .map(|name| top_level(name))
        .filter(|name| !name.is_empty() && seen.insert(name.to_string()))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{ExecutionResult, Invocation};
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    /// Pretends `stdlib` names import fine and everything else fails.
    /// Fails to spawn the probe for `unstartable`, if set.
    struct ProbeRunner {
        stdlib: Vec<&'static str>,
        unstartable: Option<&'static str>,
        probes: RefCell<Vec<String>>,
        venvs: RefCell<Vec<PathBuf>>,
    }

    impl ProbeRunner {
        fn new(stdlib: &[&'static str]) -> Self {
            Self {
                stdlib: stdlib.to_vec(),
                unstartable: None,
                probes: RefCell::new(Vec::new()),
                venvs: RefCell::new(Vec::new()),
            }
        }

        /// Temp roots of every environment created, i.e. the parent of `<root>/venv`.
        fn roots(&self) -> Vec<PathBuf> {
            self.venvs
                .borrow()
                .iter()
                .map(|venv| venv.parent().unwrap().to_path_buf())
                .collect()
        }
    }

    impl CommandRunner for ProbeRunner {
        fn stream(&self, _inv: &Invocation) -> Result<i32> {
            Ok(0)
        }
        fn probe(&self, inv: &Invocation) -> Result<bool> {
            let args = inv.arg_strings();
            assert_eq!(args[..2], ["-I", "-c"], "probes run isolated");
            let name = args[2].trim_start_matches("import ").to_string();
            if self.unstartable == Some(name.as_str()) {
                anyhow::bail!("cannot start interpreter");
            }
            self.probes.borrow_mut().push(name.clone());
            Ok(self.stdlib.iter().any(|s| *s == name))
        }
        fn capture(&self, inv: &Invocation) -> Result<ExecutionResult> {
            self.venvs
                .borrow_mut()
                .push(PathBuf::from(inv.args.last().unwrap()));
            Ok(ExecutionResult::default())
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classifies_with_one_shared_environment() {
        let runner = ProbeRunner::new(&["os", "json", "xml"]);
        let imports = set(&["os", "requests", "json", "xml.etree.ElementTree", "rich.console"]);
        let third = classify(&runner, Path::new("python3"), &imports).unwrap();

        assert_eq!(third, vec!["requests", "rich"]);
        let roots = runner.roots();
        assert_eq!(roots.len(), 1, "one environment per call");
        assert!(!roots[0].exists(), "environment removed");
    }

    #[test]
    fn test_environment_removed_when_a_probe_cannot_start() {
        let mut runner = ProbeRunner::new(&["os"]);
        runner.unstartable = Some("requests");
        let imports = set(&["os", "requests", "rich"]);

        assert!(classify(&runner, Path::new("python3"), &imports).is_err());
        assert_eq!(*runner.probes.borrow(), vec!["os"], "stopped at the failing probe");
        let roots = runner.roots();
        assert_eq!(roots.len(), 1);
        assert!(!roots[0].exists(), "environment removed on the error path");
    }

    #[test]
    fn test_submodules_collapse_to_first_segment() {
        let runner = ProbeRunner::new(&[]);
        let imports = set(&["latex2mathml.converter", "latex2mathml"]);
        let third = classify(&runner, Path::new("python3"), &imports).unwrap();
        assert_eq!(third, vec!["latex2mathml"]);
        assert_eq!(*runner.probes.borrow(), vec!["latex2mathml"]);
    }

    #[test]
    fn test_no_imports_creates_no_environment() {
        let runner = ProbeRunner::new(&[]);
        let third = classify(&runner, Path::new("python3"), &BTreeSet::new()).unwrap();
        assert!(third.is_empty());
        assert!(runner.venvs.borrow().is_empty());
    }

    #[test]
    fn test_real_interpreter_when_available() {
        use crate::env::which_python;
        use crate::runner::ProcessRunner;

        let Ok(python) = which_python(None) else {
            return;
        };
        // Hosts without the venv module cannot run this probe at all.
        if EphemeralEnv::create(&ProcessRunner, &python, false).is_err() {
            return;
        }
        let imports = set(&["os.path", "json", "slothx_surely_missing_module"]);
        let third = classify(&ProcessRunner, &python, &imports).unwrap();
        assert_eq!(third, vec!["slothx_surely_missing_module"]);
    }

    #[test]
    fn test_pythonpath_does_not_leak_into_probes() {
        use crate::env::which_python;
        use crate::runner::ProcessRunner;

        let Ok(python) = which_python(None) else {
            return;
        };
        if EphemeralEnv::create(&ProcessRunner, &python, false).is_err() {
            return;
        }
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("slothx_pythonpath_only.py"), "VALUE = 1\n").unwrap();

        // Only this test imports the module, so other tests are unaffected.
        std::env::set_var("PYTHONPATH", site.path());
        let third = classify(&ProcessRunner, &python, &set(&["slothx_pythonpath_only"]));
        std::env::remove_var("PYTHONPATH");

        assert_eq!(third.unwrap(), vec!["slothx_pythonpath_only"]);
    }

    #[test]
    fn test_order_follows_input_iteration() {
        let runner = ProbeRunner::new(&[]);
        let ordered = vec!["zeta".to_string(), "alpha.x".to_string(), "zeta.y".to_string()];
        let third = classify(&runner, Path::new("python3"), &ordered).unwrap();
        assert_eq!(third, vec!["zeta", "alpha"]);
    }
}
