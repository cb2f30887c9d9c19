//! Layered configuration tests: global file, workspace files, environment

use crate::integration::test_utils::with_isolated_env;
use reel::cli::RunContext;
use reel::config::ConfigLoader;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(path: PathBuf, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_global_config_is_read_from_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let global = ConfigLoader::global_config_path().unwrap();
        assert_eq!(
            global,
            test_dir.path().join("xdg-config").join("reel").join("config.toml")
        );
        write(global, "[provider]\napi_key = \"global\"\n");

        let workspace = test_dir.path().join("workspace");
        std::fs::create_dir_all(&workspace).unwrap();
        let config = ConfigLoader::load(&workspace).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("global"));
        assert!(config.provider.has_credentials());
    });
}

#[test]
fn test_layer_precedence() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        write(
            ConfigLoader::global_config_path().unwrap(),
            "[provider]\napi_key = \"global\"\nendpoint = \"https://global.example/detail\"\n\n[logging]\nlevel = \"error\"\n",
        );
        let workspace = test_dir.path().join("workspace");
        write(
            workspace.join("config").join("config.toml"),
            "[provider]\nendpoint = \"https://workspace.example/detail\"\n",
        );
        std::env::set_var("REEL__PROVIDER__API_KEY", "from-env");

        let config = ConfigLoader::load(&workspace).unwrap();

        assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.provider.endpoint, "https://workspace.example/detail");
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.provider.id_param, "emsVersionId");
    });
}

#[test]
fn test_invalid_config_is_rejected_by_run_context() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = test_dir.path().join("workspace");
        write(
            workspace.join("config").join("config.toml"),
            "[provider]\nendpoint = \"ftp://example.com\"\n\n[storage]\nstore_path = \"store\"\n",
        );

        let result = RunContext::new(workspace, None);
        let message = match result {
            Ok(_) => panic!("invalid endpoint accepted"),
            Err(e) => e.to_string(),
        };
        assert!(message.contains("Configuration validation failed"));
        assert!(message.contains("Provider:"));
    });
}

#[test]
fn test_store_path_from_workspace_config() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = test_dir.path().join("workspace");
        write(
            workspace.join("config").join("config.toml"),
            "[storage]\nstore_path = \".reel/store\"\n",
        );

        let ctx = RunContext::new(workspace.clone(), None).unwrap();
        assert_eq!(ctx.store_path(), workspace.join(".reel").join("store"));
        assert!(ctx.store_path().is_dir());
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_store_path_uses_data_dir() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = test_dir.path().join("workspace");
        std::fs::create_dir_all(&workspace).unwrap();

        let ctx = RunContext::new(workspace, None).unwrap();
        assert_eq!(
            ctx.store_path(),
            test_dir.path().join("xdg-data").join("reel").join("store")
        );
    });
}

#[test]
fn test_explicit_config_file_skips_workspace_layers() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = test_dir.path().join("workspace");
        write(
            workspace.join("config").join("config.toml"),
            "[provider]\napi_key = \"workspace\"\n",
        );
        let explicit = test_dir.path().join("explicit.toml");
        write(explicit.clone(), "[resolver]\ndedupe_in_flight = false\n");

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert!(config.provider.api_key.is_none());
        assert!(!config.resolver.dedupe_in_flight);
    });
}
