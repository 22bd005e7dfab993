use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, text: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, text).unwrap();
}

#[test]
fn include_cycle_visits_each_file_once() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.cpp", "#include \"b.hpp\"\n");
    write(dir.path(), "b.hpp", "#include \"a.cpp\"\n#include \"b.hpp\"\n");
    let files = dzt_core::collect_config_files(&dir.path().join("a.cpp"));
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.cpp", "b.hpp"]);
}

#[test]
fn includes_are_preorder_and_relative_to_includer() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "config.cpp",
        "#include \"sub/one.hpp\"\n#include \"missing.hpp\"\n#include \"two.hpp\"\n",
    );
    write(dir.path(), "sub/one.hpp", "#include \"deep/three.hpp\"\n");
    write(dir.path(), "sub/deep/three.hpp", "");
    write(dir.path(), "two.hpp", "#include \"sub/../two.hpp\"\n");
    let files = dzt_core::collect_config_files(&dir.path().join("config.cpp"));
    let rel: Vec<String> = files
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(rel, vec!["config.cpp", "sub/one.hpp", "sub/deep/three.hpp", "two.hpp"]);
}

#[test]
fn missing_entry_is_config_not_found() {
    let dir = tempfile::tempdir().unwrap();
    match dzt_core::load_classes(dir.path()) {
        Err(dzt_core::Error::ConfigNotFound(p)) => assert_eq!(p, dir.path()),
        other => panic!("unexpected: {other:?}"),
    }
}

fn sample_mod(root: &Path) {
    write(
        root,
        "config.cpp",
        r#"class CfgPatches { class MyMod { units[] = {}; }; };
#include "vehicles.hpp"
class CfgVehicles
{
    class Inventory_Base;
    class MyKnife: Inventory_Base { scope = 2; };
    class MyHiddenBase: Inventory_Base { scope = 0; };
};
"#,
    );
    write(
        root,
        "vehicles.hpp",
        r#"class CfgVehicles
{
    class OffroadHatchback;
    class MyCar: OffroadHatchback_Car_Base { scope = 2; class Cargo { scope = 1; }; };
    class MyKnife: Inventory_Base { scope = 1; };
    class MyTruck: Truck_01_Base { scope = 2; };
};
"#,
    );
}

#[test]
fn load_keeps_include_order_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    sample_mod(dir.path());
    let loaded = dzt_core::load_classes(dir.path()).unwrap();
    assert_eq!(loaded.files.len(), 2);
    let names: Vec<_> = loaded.classes.iter().map(|c| c.name.as_str()).collect();
    // per-file lists are concatenated in visit order, not spliced at the include
    assert_eq!(names, vec!["MyKnife", "MyHiddenBase", "MyCar", "MyKnife", "MyTruck"]);
    assert!(loaded.classes[0].source_file.as_ref().unwrap().ends_with("config.cpp"));
    assert!(loaded.classes[2].source_file.as_ref().unwrap().ends_with("vehicles.hpp"));
    assert_eq!(loaded.classes[2].base_class.as_deref(), Some("OffroadHatchback_Car_Base"));
    assert_eq!(loaded.classes[3].scope, Some(1));
}

#[test]
fn generate_types_filters_and_dedupes() {
    let dir = tempfile::tempdir().unwrap();
    sample_mod(dir.path());
    let opts = dzt_core::GenerateOptions {
        scope: Some(2),
        ..Default::default()
    };
    let out = dzt_core::generate_types(dir.path(), &opts, None).unwrap();
    assert_eq!(out.stats.total_classes, 5);
    assert_eq!(out.stats.included, 3);
    assert_eq!(
        out.document,
        dzt_core::emit_types(&["MyKnife", "MyCar", "MyTruck"], &Default::default())
    );

    let all = dzt_core::generate_types(dir.path(), &Default::default(), None).unwrap();
    assert_eq!(all.stats.included, 4);

    let none = dzt_core::GenerateOptions {
        scope: Some(9),
        ..Default::default()
    };
    let empty = dzt_core::generate_types(dir.path(), &none, None).unwrap();
    assert_eq!(empty.stats.included, 0);
    assert!(!empty.document.contains("<type "));
}

#[test]
fn generate_types_merges_into_existing() {
    let dir = tempfile::tempdir().unwrap();
    sample_mod(dir.path());
    let existing = concat!(
        "<?xml version=\"1.0\"?>\n<types>\n",
        "    <type name=\"MyCar\"><nominal>3</nominal></type>\n",
        "</types>\n",
    );
    let opts = dzt_core::GenerateOptions {
        scope: Some(2),
        ..Default::default()
    };
    let out = dzt_core::generate_types(dir.path(), &opts, Some(existing)).unwrap();
    assert_eq!(out.stats.added, 2);
    assert!(out.document.contains("<type name=\"MyCar\"><nominal>3</nominal></type>"));
    assert!(out.document.contains("<type name=\"MyTruck\">"));
    let again = dzt_core::generate_types(dir.path(), &opts, Some(&out.document)).unwrap();
    assert_eq!(again.stats.added, 0);
    assert_eq!(again.document, out.document);
}

#[test]
fn spawnable_types_vehicle_filter() {
    let dir = tempfile::tempdir().unwrap();
    sample_mod(dir.path());
    let out = dzt_core::generate_spawnable_types(dir.path(), true).unwrap();
    assert_eq!(out.document, dzt_core::emit_spawnable_types(&["MyCar", "MyTruck"]));
    let all = dzt_core::generate_spawnable_types(dir.path(), false).unwrap();
    assert_eq!(all.stats.included, 4);
}

#[test]
fn config_file_path_is_its_own_entry() {
    let dir = tempfile::tempdir().unwrap();
    sample_mod(dir.path());
    let file = dir.path().join("vehicles.hpp");
    assert_eq!(dzt_core::find_config_entry(&file), Some(file.clone()));
    let loaded = dzt_core::load_classes(&file).unwrap();
    assert_eq!(loaded.classes.len(), 3);
}

#[test]
fn nested_config_files_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "addons/b/config.cpp", "");
    write(dir.path(), "addons/a/config.cpp", "");
    write(dir.path(), "addons/a/other.hpp", "");
    assert_eq!(dzt_core::find_config_entry(dir.path()), None);
    let found = dzt_core::find_config_files(dir.path());
    assert_eq!(
        found,
        vec![dir.path().join("addons/a/config.cpp"), dir.path().join("addons/b/config.cpp")]
    );
}

#[test]
fn mission_scan_reports_files() {
    let dir = tempfile::tempdir().unwrap();
    let mission = dir.path().join("dayzOffline.chernarusplus");
    write(&mission, "types.xml", "<types/>");
    let scan = dzt_core::mission::scan_mission_folder(&mission);
    assert!(scan.exists && scan.is_directory && !scan.is_map_empty);
    assert_eq!(scan.files.get("types.xml"), Some(&true));
    assert_eq!(scan.files.get("spawnabletypes.xml"), Some(&false));

    let empty = dir.path().join("x.map.empty");
    fs::create_dir_all(&empty).unwrap();
    assert!(dzt_core::mission::scan_mission_folder(&empty).is_map_empty);

    let gone = dzt_core::mission::scan_mission_folder(&dir.path().join("nope"));
    assert!(!gone.exists && gone.files.is_empty());
}

#[test]
fn zip_backup_file_and_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "mission/types.xml", "<types/>");
    write(dir.path(), "mission/db/events.xml", "<events/>");
    let f = dzt_core::backup::zip_backup(&dir.path().join("mission/types.xml")).unwrap();
    assert!(f.exists());
    assert!(f.file_name().unwrap().to_string_lossy().starts_with("types.xml_"));
    let d = dzt_core::backup::zip_backup(&dir.path().join("mission")).unwrap();
    assert!(d.exists());
    assert_eq!(d.parent(), Some(dir.path()));
    assert!(dzt_core::backup::zip_backup(&dir.path().join("nope")).is_err());
}

#[test]
fn vehicle_spec_from_json_text() {
    let text = r#"{"vehicles":[{"name":"CivilianSedan","attachments":[{"name":"CivSedanWheel","chance":"0.7"}]}]}"#;
    let spec = dzt_core::vehicle_spec::parse_spec_str(text).unwrap();
    let xml = dzt_core::vehicle_spec::emit(&spec);
    assert!(xml.contains("<item name=\"CivSedanWheel\" chance=\"0.70\" />"));
    let bad = r#"{"vehicles":[{},{"name":"x","attachments":5}]}"#;
    match dzt_core::vehicle_spec::parse_spec_str(bad) {
        Err(dzt_core::Error::MalformedSpec(errs)) => assert_eq!(errs.len(), 2),
        other => panic!("unexpected: {other:?}"),
    }
}
