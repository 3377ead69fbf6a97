use anyhow::{Context, Result};
use std::{env, fs, path::PathBuf};

const STARTER_CONFIG: &str = r#"[settings]
default_env = "default"

[env.default]
description = "Full QA gate"
deps = ["pytest", "flake8", "pydocstyle", "black", "isort"]
commands = [
    "black --check --diff .",
    "isort --check --diff .",
    "flake8 {tool:flake8} .",
    "- pydocstyle {tool:pydocstyle} .",
    "pytest {posargs}",
]

[env.pytest]
description = "Unit tests only"
deps = ["pytest"]
commands = ["pytest {posargs}"]

[env.format]
description = "Rewrite formatting in place"
deps = ["black", "isort"]
commands = ["black .", "isort ."]

[env.lint]
description = "Static checks only"
deps = ["flake8", "pydocstyle"]
commands = [
    "flake8 {tool:flake8} .",
    "- pydocstyle {tool:pydocstyle} .",
]

[tool.flake8]
ignore = ["W503"]
max_line_length = 88
max_complexity = 10

[tool.pydocstyle]
ignore = ["D105", "D203", "D213"]
"#;

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    let project_root = if let Some(cwd) = cwd {
        PathBuf::from(cwd)
    } else {
        env::current_dir().context("Failed to get current directory")?
    };

    let config_path = project_root.join("envrun.toml");

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    fs::write(&config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Next steps:");
    println!("   envrun list            Show the defined environments");
    println!("   envrun run             Run the full QA gate");
    println!("   envrun run pytest      Run only the tests");
    println!("   envrun run pytest -- -k smoke");
    println!("                          Pass extra arguments through {{posargs}}");
    Ok(())
}
