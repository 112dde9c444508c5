// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["simfork"]).unwrap();
    assert_eq!(cli.main_class, DEFAULT_MAIN_CLASS);
    assert_eq!(cli.bootstrap_class, DEFAULT_BOOTSTRAP_CLASS);
    assert_eq!(cli.results_dir, "results");
    assert_eq!(cli.output_format, OutputFormat::Text);
    assert!(!cli.batch);
    assert!(!cli.skip);
    assert!(cli.simulation.is_none());
}

#[test]
fn repeatable_flags_accumulate_in_order() {
    let cli = Cli::try_parse_from([
        "simfork",
        "--include",
        "a.*",
        "--include",
        "b.**",
        "--exclude",
        "a.internal.*",
        "--classpath",
        "target/classes",
        "--classpath",
        "lib/engine.jar",
        "--jvm-arg",
        "-Xmx2G",
    ])
    .unwrap();
    assert_eq!(cli.includes, vec!["a.*", "b.**"]);
    assert_eq!(cli.excludes, vec!["a.internal.*"]);
    assert_eq!(cli.classpath, vec!["target/classes", "lib/engine.jar"]);
    assert_eq!(cli.jvm_args, vec!["-Xmx2G"]);
}

#[test]
fn property_definitions_parse_as_pairs() {
    let cli = Cli::try_parse_from(["simfork", "-D", "a=1", "-D", "b=x=y"]).unwrap();
    assert_eq!(
        cli.properties,
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "x=y".to_string())
        ]
    );
}

#[test]
fn property_without_equals_is_rejected() {
    assert!(Cli::try_parse_from(["simfork", "-D", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["simfork", "-D", "=orphan"]).is_err());
}

#[test]
fn property_value_may_be_empty() {
    let cli = Cli::try_parse_from(["simfork", "-D", "flag="]).unwrap();
    assert_eq!(cli.properties, vec![("flag".to_string(), String::new())]);
}

#[test]
fn output_format_json_parses() {
    let cli = Cli::try_parse_from(["simfork", "--output-format", "json"]).unwrap();
    assert_eq!(cli.output_format, OutputFormat::Json);
}

#[test]
fn explicit_simulation_short_flag() {
    let cli = Cli::try_parse_from(["simfork", "-s", "com.acme.BasicSimulation"]).unwrap();
    assert_eq!(cli.simulation.as_deref(), Some("com.acme.BasicSimulation"));
}
