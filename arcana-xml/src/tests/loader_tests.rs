use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use super::*;

const BOOK_A: &str = r#"<spellbook name="Book A">
    <spell level="2" school="transmutation" guild="true">
        <name>Alter Self</name>
        <category/>
        <range>Self</range>
        <duration>Concentration, up to 1 hour.</duration>
        <casting-time>1 action</casting-time>
        <description>You assume a different form.</description>
        <casters><sorcerer/><wizard/></casters>
        <components><verbal/><somatic/></components>
    </spell>
</spellbook>"#;

const BOOK_B: &str = r#"<spellbook name="Book B">
    <spell level="0" school="conjuration">
        <name>Acid Splash</name>
        <range>60 feet</range>
        <duration>Instantaneous</duration>
        <casting-time>1 action</casting-time>
        <description>You hurl a bubble of acid.</description>
        <casters><wizard/></casters>
        <components><verbal/></components>
    </spell>
</spellbook>"#;

fn write_gzip(path: &Path, contents: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn loads_plain_and_gzip_files_alike() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("book_a.xml");
    let zipped = dir.path().join("book_a.xml.gz");
    std::fs::write(&plain, BOOK_A).unwrap();
    write_gzip(&zipped, BOOK_A);

    let from_plain = load_spellbook(&plain).unwrap();
    let from_zipped = load_spellbook(&zipped).unwrap();
    assert_eq!(from_plain, from_zipped);
    assert_eq!(from_plain[0].name, "Alter Self");
    assert!(from_plain[0].guild);
}

#[test]
fn compression_is_detected_by_content() {
    let dir = tempfile::tempdir().unwrap();
    let misnamed = dir.path().join("book_b.xml");
    write_gzip(&misnamed, BOOK_B);

    let spells = load_spellbook(&misnamed).unwrap();
    assert_eq!(spells[0].book, "Book B");
}

#[test]
fn errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.xml");
    std::fs::write(&broken, "<spellbook>").unwrap();

    let err = load_spellbook(&broken).unwrap_err();
    assert!(matches!(err, XmlError::InFile { .. }));
    assert!(err.to_string().contains("broken.xml"));
}

#[test]
fn lists_only_spellbook_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.xml"), BOOK_B).unwrap();
    write_gzip(&dir.path().join("a.xml.gz"), BOOK_A);
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    std::fs::create_dir(dir.path().join("nested.xml")).unwrap();

    let files = spellbook_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.xml.gz", "b.xml"]);
}

#[test]
fn loads_every_book_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_gzip(&dir.path().join("a.xml.gz"), BOOK_A);
    std::fs::write(dir.path().join("b.xml"), BOOK_B).unwrap();

    let mut events = Vec::new();
    let spells = load_all_spellbooks(dir.path(), |event| match event {
        LoadProgress::Loading { path } => events.push(format!("loading {}", spellbook_stem(path))),
        LoadProgress::Loaded { path, spells } => {
            events.push(format!("loaded {} ({spells})", spellbook_stem(path)))
        }
    })
    .unwrap();
    let books: Vec<&str> = spells.iter().map(|s| s.book.as_str()).collect();
    assert_eq!(books, vec!["Book A", "Book B"]);
    assert_eq!(
        events,
        vec!["loading a", "loaded a (1)", "loading b", "loaded b (1)"]
    );
}

#[test]
fn load_all_stops_at_first_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.xml"), "<spellbook>").unwrap();
    std::fs::write(dir.path().join("b.xml"), BOOK_B).unwrap();

    let mut loaded = 0;
    let err = load_all_spellbooks(dir.path(), |event| {
        if let LoadProgress::Loaded { .. } = event {
            loaded += 1;
        }
    })
    .unwrap_err();
    assert!(err.to_string().contains("a.xml"));
    assert_eq!(loaded, 0);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = spellbook_files(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, XmlError::Io(_)));
}

#[test]
fn stems_drop_spellbook_suffixes() {
    assert_eq!(spellbook_stem(Path::new("dir/phb.xml.gz")), "phb");
    assert_eq!(spellbook_stem(Path::new("phb.XML")), "phb");
    assert_eq!(spellbook_stem(Path::new("phb.txt")), "phb.txt");
}
