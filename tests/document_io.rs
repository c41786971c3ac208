//! Loading and saving documents through file system hosts, plus the
//! serializable snapshot view.

use std::path::{Path, PathBuf};

use insta::assert_snapshot;

use tagedit::{
    snapshot_from_document, AttributeHolder, AttributeStructure, Document, FileSystemHost,
    InMemoryFileSystemHost, LoadError, NodeSnapshot,
};

#[test]
fn loads_edits_and_saves_through_a_host() {
    let mut host = InMemoryFileSystemHost::new();
    let path = Path::new("/pages/index.tag");
    host.write_file(path, "<Page>").unwrap();

    let doc = Document::from_path(&host, path).unwrap();
    doc.tag(0)
        .unwrap()
        .insert_attribute(0, &AttributeStructure::new("title").with_string_value("Home"))
        .unwrap();
    doc.save(&mut host, path).unwrap();

    assert_eq!(host.read_file(path).unwrap(), r#"<Page title="Home">"#);
}

#[test]
fn load_reports_missing_files_as_host_errors() {
    let host = InMemoryFileSystemHost::new();
    let err = Document::from_path(&host, Path::new("/missing.tag")).unwrap_err();
    assert!(matches!(err, LoadError::Host(_)));
}

#[test]
fn load_reports_bad_content_as_parse_errors() {
    let mut host = InMemoryFileSystemHost::new();
    let path = Path::new("/broken.tag");
    host.write_file(path, "<Page").unwrap();
    let err = Document::from_path(&host, path).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn glob_selects_documents_to_load() {
    let mut host = InMemoryFileSystemHost::new();
    host.write_file(Path::new("pages/a.tag"), "<A>").unwrap();
    host.write_file(Path::new("pages/sub/b.tag"), "<B>").unwrap();
    host.write_file(Path::new("notes.txt"), "plain").unwrap();

    let found = host.glob(&["**/*.tag".to_string()]).unwrap();
    assert_eq!(
        found,
        [PathBuf::from("pages/a.tag"), PathBuf::from("pages/sub/b.tag")]
    );

    for path in &found {
        assert!(Document::from_path(&host, path).is_ok());
    }
}

#[test]
fn snapshot_reflects_the_edited_tree() {
    let doc = Document::parse("<Foo>text</Foo>").unwrap();
    doc.tag(0)
        .unwrap()
        .insert_attribute(0, &AttributeStructure::new("bar"))
        .unwrap();

    assert_snapshot!(doc.text(), @"<Foo bar>text</Foo>");

    let snapshot = snapshot_from_document(&doc);
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.nodes.len(), 3);
    match &snapshot.nodes[0] {
        NodeSnapshot::Tag {
            name, attributes, ..
        } => {
            assert_eq!(name, "Foo");
            assert_eq!(attributes[0].name, "bar");
        }
        other => panic!("expected a tag snapshot, got {:?}", other),
    }
}
