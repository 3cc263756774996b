//! Integration tests for `nsg generate` and `nsg inspect`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use nativescript_cli::commands::{generate, GenerateOptions};
use nativescript_sdk::TypeInfo;

const PLAYER_HEADER: &str = r#"#pragma once

#include "ns.h"

UCLASS()
class Player : public Script {
public:
    UPROPERTY()
    int health = 100;

    UPROPERTY()
    float speed;
};
"#;

const PLAYER_SOURCE: &str = "#include \"player.h\"\n#include <cstdio>\n\nvoid tick(Player& p) { p.health -= 1; }\n";

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("game")).unwrap();
    fs::write(src.join("player.h"), PLAYER_HEADER).unwrap();
    fs::write(src.join("player.cpp"), PLAYER_SOURCE).unwrap();
    fs::write(src.join("game/stats.hpp"), "USTRUCT()\nstruct Stats {\n    UPROPERTY() double ratio;\n};\n").unwrap();
    fs::write(src.join("notes.txt"), "not scanned").unwrap();
    dir
}

fn options(dir: &Path) -> GenerateOptions {
    GenerateOptions {
        input: dir.join("src"),
        output: dir.join("out"),
        ..GenerateOptions::default()
    }
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

// ────────────────────────────────────────────────────────────────────────────
// generate
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_generate_writes_mirrored_tree() {
    let dir = project();
    let summary = generate::execute(&options(dir.path())).unwrap();

    assert_eq!(summary.headers, 2);
    assert_eq!(summary.sources, 1);
    assert_eq!(summary.types, 2);
    assert_eq!(summary.fields, 3);
    assert_eq!(summary.diagnostics, 0);
    assert_eq!(
        summary.written,
        vec![
            PathBuf::from("game/stats.generated.hpp"),
            PathBuf::from("player.generated.h"),
            PathBuf::from("player.generated.cpp"),
            PathBuf::from("scripts.generated.h"),
            PathBuf::from("scripts.generated.cpp"),
            PathBuf::from("ns.h"),
        ]
    );

    let out = dir.path().join("out");
    let header = read(out.join("player.generated.h"));
    assert!(header.starts_with(PLAYER_HEADER));
    assert!(header.contains("extern \"C\" NS_EXPORT Player* createPlayer() {\n\treturn new Player();\n}\n"));
    assert!(header.contains("extern \"C\" NS_EXPORT float Player_get_speed(Player* x) {\n\treturn x->speed;\n}\n"));
    assert!(read(out.join("game/stats.generated.hpp")).contains(" Stats_set_ratio(Stats* x, double v)"));

    let registration = read(out.join("scripts.generated.cpp"));
    assert!(registration.contains("\t*count = 2;\n"));
    assert!(registration.contains("\"createPlayer\", \"destroyPlayer\""));
    assert!(read(out.join("scripts.generated.h")).contains("getGeneratedScripts(int* count, const ns_script_info** scripts);"));
    assert!(read(out.join("ns.h")).contains("UPROPERTY(...)"));
    assert!(!out.join("notes.generated.txt").exists());
}

#[test]
fn test_generate_rewrites_includes() {
    let dir = project();
    generate::execute(&options(dir.path())).unwrap();

    let source = read(dir.path().join("out/player.generated.cpp"));
    assert_eq!(
        source,
        "#include \"player.generated.h\"\n#include <cstdio>\n\nvoid tick(Player& p) { p.health -= 1; }\n"
    );
}

#[test]
fn test_generate_metadata_json_and_no_support_header() {
    let dir = project();
    let summary = generate::execute(&GenerateOptions {
        metadata_json: true,
        no_support_header: true,
        ..options(dir.path())
    })
    .unwrap();

    let out = dir.path().join("out");
    assert!(!out.join("ns.h").exists());
    assert!(summary.written.contains(&PathBuf::from("scripts.metadata.json")));

    let types: Vec<TypeInfo> = serde_json::from_str(&read(out.join("scripts.metadata.json"))).unwrap();
    let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Stats", "Player"]);
    assert_eq!(types[1].fields[0].getter, "Player_get_health");
}

#[test]
fn test_generate_reads_config_file() {
    let dir = project();
    fs::write(
        dir.path().join("src/nsg.toml"),
        "[generate]\nheader-extensions = [\"h\"]\nsupport-header = false\nexclude = [\"game\"]\n",
    )
    .unwrap();

    let summary = generate::execute(&options(dir.path())).unwrap();
    assert_eq!(summary.headers, 1);
    assert_eq!(summary.types, 1);
    assert!(!dir.path().join("out/ns.h").exists());
    assert!(!dir.path().join("out/game").exists());
}

#[test]
fn test_generate_explicit_config_error() {
    let dir = project();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[generate\n").unwrap();

    let err = generate::execute(&GenerateOptions {
        config: Some(config),
        ..options(dir.path())
    })
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn test_generate_reports_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("bag.h"), "UCLASS()\nclass Bag {\n    UPROPERTY() size_t count;\n    UPROPERTY() int size;\n};\n").unwrap();

    let summary = generate::execute(&options(dir.path())).unwrap();
    assert_eq!(summary.diagnostics, 1);

    let header = read(dir.path().join("out/bag.generated.h"));
    assert!(header.contains("Bag_get_size"));
    assert!(!header.contains("Bag_get_count("));
}

#[test]
fn test_collisions_warned_or_denied() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("clash.h"),
        "UCLASS() class A { UPROPERTY() int get_x; };\nUCLASS() class A_get { UPROPERTY() int x; };\n",
    )
    .unwrap();

    let summary = generate::execute(&options(dir.path())).unwrap();
    assert_eq!(summary.collisions, 1);

    fs::remove_dir_all(dir.path().join("out")).unwrap();
    let err = generate::execute(&GenerateOptions {
        deny_collisions: true,
        ..options(dir.path())
    })
    .unwrap_err();
    assert!(err.to_string().contains("A_get_get_x"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_generate_rerun_ignores_previous_output() {
    let dir = project();
    let nested = GenerateOptions {
        input: dir.path().join("src"),
        output: dir.path().join("src/out"),
        ..GenerateOptions::default()
    };
    let first = generate::execute(&nested).unwrap();
    let second = generate::execute(&nested).unwrap();
    assert_eq!(first, second);
}

// ────────────────────────────────────────────────────────────────────────────
// binary
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_binary_generate() {
    let dir = project();
    let status = Command::new(env!("CARGO_BIN_EXE_nsg"))
        .arg("-q")
        .arg("generate")
        .arg(dir.path().join("src"))
        .arg(dir.path().join("out"))
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("out/scripts.generated.cpp").exists());
}

#[test]
fn test_binary_inspect_missing_module_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_nsg"))
        .arg("inspect")
        .arg(dir.path().join("libmissing.so"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not open module"));
}
