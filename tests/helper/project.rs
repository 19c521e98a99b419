//! Project directory test utilities

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Temporary project directory with a package.json and installed packages
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Installs `name` at `version` under node_modules
    pub fn install(&self, name: &str, version: &str) -> &Self {
        self.write(
            &format!("node_modules/{}/package.json", name),
            &serde_json::json!({ "name": name, "version": version }).to_string(),
        )
    }
}

/// Creates a project with the given runtime and dev dependencies installed
/// at their listed versions
pub fn create_test_project(runtime: &[(&str, &str)], dev: &[(&str, &str)]) -> TestProject {
    let project = TestProject {
        dir: TempDir::new().unwrap(),
    };

    let section = |deps: &[(&str, &str)]| {
        deps.iter()
            .map(|(name, version)| (name.to_string(), serde_json::json!(format!("^{}", version))))
            .collect::<serde_json::Map<_, _>>()
    };
    let manifest = serde_json::json!({
        "name": "test-project",
        "version": "1.0.0",
        "dependencies": section(runtime),
        "devDependencies": section(dev),
    });
    project.write("package.json", &manifest.to_string());

    for (name, version) in runtime.iter().chain(dev) {
        project.install(name, version);
    }

    project
}
