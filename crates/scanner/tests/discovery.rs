// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end discovery over a synthesized project layout: compiled classes
//! in a directory tree, shared base classes in a dependency jar.

use std::io::Write;

use simfork_scanner::testkit::ClassFileBuilder;
use simfork_scanner::{scan, SIMULATION_MARKERS};
use tempfile::TempDir;

fn write_class(dir: &TempDir, builder: &ClassFileBuilder) {
    let path = dir.path().join(builder.class_path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, builder.build()).unwrap();
}

#[test]
fn project_with_shared_base_in_jar() {
    let classes = TempDir::new().unwrap();
    let libs = TempDir::new().unwrap();

    // Dependency jar: an abstract company-wide base simulation.
    let base = ClassFileBuilder::concrete("com.acme.testing.CompanySimulation")
        .abstract_class()
        .extends(SIMULATION_MARKERS[0]);
    let jar = libs.path().join("acme-testing.jar");
    {
        let file = std::fs::File::create(&jar).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let opts = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file(base.class_path(), opts).unwrap();
        zip.write_all(&base.build()).unwrap();
        zip.finish().unwrap();
    }

    // Project classes: two concrete scenarios, one helper, one local
    // abstract intermediary.
    write_class(
        &classes,
        &ClassFileBuilder::concrete("com.acme.load.CheckoutSimulation")
            .extends("com.acme.testing.CompanySimulation"),
    );
    write_class(
        &classes,
        &ClassFileBuilder::concrete("com.acme.load.BrowseSimulation")
            .extends(SIMULATION_MARKERS[1]),
    );
    write_class(
        &classes,
        &ClassFileBuilder::concrete("com.acme.load.support.Feeders"),
    );
    write_class(
        &classes,
        &ClassFileBuilder::concrete("com.acme.load.ScenarioBase")
            .abstract_class()
            .extends("com.acme.testing.CompanySimulation"),
    );

    let result = scan(&[classes.path().to_path_buf()], &[jar]).unwrap();
    assert_eq!(
        result.simulation_classes(),
        vec![
            "com.acme.load.BrowseSimulation",
            "com.acme.load.CheckoutSimulation"
        ]
    );
}
