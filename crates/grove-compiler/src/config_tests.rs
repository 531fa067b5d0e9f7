use crate::Config;

#[test]
fn sort_key_normalization() {
    let config = Config::default();

    assert_eq!(config.sort_key("_Expression"), "Expression");
    assert_eq!(config.sort_key("pattern"), "Expression");
    assert_eq!(config.sort_key("_Pattern"), "Expression");
    assert_eq!(config.sort_key("statement"), "Statement");
    assert_eq!(config.sort_key("Mapping"), "Mapping_Expression");
    assert_eq!(config.sort_key("_mapping"), "Mapping_Expression");
}

#[test]
fn constructor_key_capitalizes() {
    let config = Config::default();
    assert_eq!(config.constructor_key("call"), "Call");
    assert_eq!(config.constructor_key("Call"), "Call");
}

#[test]
fn custom_conventions() {
    let config = Config::new()
        .internal_prefix("$")
        .rename_sort("Range", "Range_Expression")
        .embedding_constructors("Quote", "TypedQuote")
        .meta_variable_constructor("Hole");

    assert_eq!(config.sort_key("$Range"), "Range_Expression");
    assert!(config.is_embedding_constructor("TypedQuote"));
    assert!(!config.is_embedding_constructor("ConcreteQuoted"));
    assert!(config.is_meta_variable_constructor("Hole"));
    assert!(config.is_meta_variable_constructor("MetaVariable"));
}

#[test]
fn embedding_sorts() {
    let config = Config::default();
    assert!(config.is_embedding_sort("Expression"));
    assert!(config.is_embedding_sort("_Pattern"));
    assert!(!config.is_embedding_sort("Statement"));
}
