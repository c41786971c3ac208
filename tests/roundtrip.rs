//! Property tests for the edit engine: insert-then-remove is the identity
//! on the source text, and rendering is a pure function of its inputs.

use proptest::prelude::*;

use tagedit::{
    render_attributes, AttributeHolder, AttributeStructure, Document, FormattingContext,
};

fn attribute_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9]{0,5}", 0..5)
}

fn tag_text(names: &[String]) -> String {
    let mut text = String::from("<Tag");
    for name in names {
        text.push(' ');
        text.push_str(name);
    }
    text.push('>');
    text
}

proptest! {
    #[test]
    fn insert_then_remove_restores_the_exact_text(
        names in attribute_names(),
        new_name in "[a-z][a-z0-9]{0,5}",
        index_seed in 0usize..6,
    ) {
        let original = tag_text(&names);
        let index = index_seed % (names.len() + 1);

        let doc = Document::parse(original.as_str()).unwrap();
        let tag = doc.tag(0).unwrap();
        let inserted = tag
            .insert_attribute(index, &AttributeStructure::new(new_name.clone()))
            .unwrap();

        prop_assert_eq!(inserted.name().unwrap(), new_name);
        prop_assert_eq!(inserted.index().unwrap(), index);

        inserted.remove().unwrap();
        prop_assert_eq!(doc.text(), original);
    }

    #[test]
    fn insert_produces_the_expected_attribute_order(
        names in attribute_names(),
        new_name in "[a-z][a-z0-9]{0,5}",
        index_seed in 0usize..6,
    ) {
        let index = index_seed % (names.len() + 1);
        let doc = Document::parse(tag_text(&names).as_str()).unwrap();
        let tag = doc.tag(0).unwrap();
        tag.insert_attribute(index, &AttributeStructure::new(new_name.clone()))
            .unwrap();

        let mut expected = names.clone();
        expected.insert(index, new_name);
        let actual: Vec<String> = tag
            .attributes()
            .unwrap()
            .into_iter()
            .map(|attr| attr.name().unwrap())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn empty_insert_never_changes_the_text(
        names in attribute_names(),
        index_seed in 0usize..6,
    ) {
        let original = tag_text(&names);
        let index = index_seed % (names.len() + 1);
        let doc = Document::parse(original.as_str()).unwrap();
        let tag = doc.tag(0).unwrap();
        let inserted = tag.insert_attributes(index, &[]).unwrap();
        prop_assert!(inserted.is_empty());
        prop_assert_eq!(doc.text(), original);
    }

    #[test]
    fn rendering_is_deterministic(names in attribute_names()) {
        let structures: Vec<AttributeStructure> =
            names.iter().map(AttributeStructure::new).collect();
        let first = render_attributes(&structures, FormattingContext::default());
        let second = render_attributes(&structures, FormattingContext::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reparse_after_edit_round_trips_through_text(
        names in attribute_names(),
        new_name in "[a-z][a-z0-9]{0,5}",
    ) {
        let doc = Document::parse(tag_text(&names).as_str()).unwrap();
        let tag = doc.tag(0).unwrap();
        tag.add_attribute(&AttributeStructure::new(new_name)).unwrap();

        let reparsed = Document::parse(doc.text()).unwrap();
        prop_assert_eq!(reparsed.text(), doc.text());
        prop_assert_eq!(
            reparsed.tag(0).unwrap().attributes().unwrap().len(),
            names.len() + 1
        );
    }
}
