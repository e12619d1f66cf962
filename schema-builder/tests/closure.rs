use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;
use schema_builder::annotations;
use schema_builder::index::AnnotationInstance;
use schema_builder::index::ClassInfo;
use schema_builder::index::ClassKind;
use schema_builder::index::EnumValueInfo;
use schema_builder::index::MethodInfo;
use schema_builder::index::TypeSignature;

use crate::fixtures::*;

fn sorted<'a>(names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<_> = names.map(String::as_str).collect();
    names.sort();
    names
}

fn library() -> Vec<ClassInfo> {
    vec![
        ClassInfo::new("com.example.Book")
            .field(field("title", string()))
            .field(field("author", class("com.example.Author")).annotated(meta(annotations::NON_NULL)))
            .field(field("genre", class("com.example.Genre")))
            .field(field(
                "reviews",
                TypeSignature::parameterized(
                    "java.util.Map",
                    vec![string(), list_of(class("com.example.Review"))],
                ),
            ))
            .field(field("related", list_of(class("com.example.Book")))),
        ClassInfo::new("com.example.Author")
            .field(field("name", string()))
            .field(field("books", list_of(class("com.example.Book")))),
        ClassInfo::new("com.example.Genre")
            .of_kind(ClassKind::Enum)
            .enum_value(EnumValueInfo::new("FICTION"))
            .enum_value(EnumValueInfo::new("POETRY")),
        ClassInfo::new("com.example.Review").field(field("stars", int())),
        ClassInfo::new("com.example.BookFilter")
            .field(field("genre", class("com.example.Genre")))
            .field(field("title", string()).annotated(meta(annotations::NOT_BLANK))),
        api("com.example.LibraryApi")
            .method(
                query("books", list_of(class("com.example.Book")))
                    .parameter(parameter("filter", class("com.example.BookFilter"))),
            )
            .method(
                mutation("addBook", class("com.example.Book"))
                    .parameter(parameter("book", class("com.example.Book"))),
            ),
    ]
}

#[test]
fn every_reachable_type_is_in_the_schema() {
    let schema = build(library()).unwrap();

    assert_eq!(sorted(schema.types.keys()), ["Author", "Book", "Review"]);
    assert_eq!(
        sorted(schema.inputs.keys()),
        ["AuthorInput", "BookFilterInput", "BookInput", "ReviewInput"]
    );
    assert_eq!(sorted(schema.enums.keys()), ["Genre"]);
    assert!(schema.contains_input("BookInput"));
    assert!(!schema.contains_input("Book"));
    assert!(schema.dangling_references().is_empty());

    let reviews = &schema.types["Book"].fields["reviews"];
    let wrapper = reviews.wrapper.as_ref().unwrap();
    assert_eq!(wrapper.key.as_ref().unwrap().name, "String");
    assert_eq!(wrapper.depth(), 2);
    assert_eq!(reviews.reference.name, "Review");
}

#[test]
fn cycles_create_each_type_once() {
    let schema = build(vec![
        ClassInfo::new("com.example.A").field(field("b", class("com.example.B"))),
        ClassInfo::new("com.example.B").field(field("a", class("com.example.A"))),
        api("com.example.Api").method(query("a", class("com.example.A"))),
    ])
    .unwrap();

    assert_eq!(sorted(schema.types.keys()), ["A", "B"]);
    assert_eq!(schema.types["A"].fields["b"].reference.name, "B");
    assert_eq!(schema.types["B"].fields["a"].reference.name, "A");
}

fn a_to_b_and_c() -> Vec<ClassInfo> {
    vec![
        ClassInfo::new("com.example.A").field(field("b", class("com.example.B"))),
        ClassInfo::new("com.example.B").field(field("name", string())),
        ClassInfo::new("com.example.C").field(field("name", string())),
        api("com.example.Api")
            .method(query("a", class("com.example.A")))
            .method(query("c", class("com.example.C"))),
    ]
}

#[rstest]
#[case::declaration_order(false)]
#[case::reverse_order(true)]
fn scan_order_does_not_change_the_schema(#[case] reverse: bool) {
    let mut classes = a_to_b_and_c();
    if reverse {
        classes.reverse();
    }
    let schema = build(classes).unwrap();

    let types: Vec<_> = schema.types.keys().map(String::as_str).collect();
    assert_eq!(types, ["A", "C", "B"]);
    assert_eq!(schema, build(a_to_b_and_c()).unwrap());
}

#[test]
fn missing_declarations_fail_the_build() {
    let error = build(vec![
        api("com.example.Api").method(query("missing", class("com.example.Missing"))),
    ])
    .unwrap_err();
    assert_snapshot!(
        error.to_string(),
        @r#"Could not find class com.example.Missing in the index (referenced as TYPE "Missing")"#
    );
}

#[test]
fn unsupported_member_shapes_fail_the_build() {
    let error = build(vec![
        ClassInfo::new("com.example.Shelf").field(field("books", class("java.util.List"))),
        api("com.example.Api").method(query("shelf", class("com.example.Shelf"))),
    ])
    .unwrap_err();
    assert_snapshot!(
        error.to_string(),
        @"Unsupported type java.util.List for com.example.Shelf.books: raw collections have no item type"
    );
}

#[test]
fn generic_types_are_created_per_argument_list() {
    let page_of = |item: &str| {
        TypeSignature::parameterized("com.example.Page", vec![class(item)])
    };
    let schema = build(vec![
        ClassInfo::new("com.example.Page")
            .type_parameter("T")
            .field(field("items", list_of(TypeSignature::variable("T"))))
            .field(field("total", int())),
        ClassInfo::new("com.example.Book").field(field("title", string())),
        ClassInfo::new("com.example.Author").field(field("name", string())),
        api("com.example.Api")
            .method(query("books", page_of("com.example.Book")))
            .method(query("authors", page_of("com.example.Author"))),
    ])
    .unwrap();

    assert_eq!(
        sorted(schema.types.keys()),
        ["Author", "Book", "Page_Author", "Page_Book"]
    );
    assert_eq!(schema.types["Page_Book"].fields["items"].reference.name, "Book");
    assert_eq!(schema.types["Page_Author"].fields["items"].reference.name, "Author");
    assert!(schema.types["Page_Book"].fields["total"].not_null);
}

fn search() -> Vec<ClassInfo> {
    vec![
        ClassInfo::new("com.example.Shape")
            .of_kind(ClassKind::Interface)
            .method(MethodInfo::new("getArea", TypeSignature::class("java.lang.Double"))),
        ClassInfo::new("com.example.Square")
            .implements("com.example.Shape")
            .field(field("side", int())),
        ClassInfo::new("com.example.Circle")
            .implements("com.example.Shape")
            .field(field("radius", int())),
        ClassInfo::new("com.example.SearchResult")
            .of_kind(ClassKind::Interface)
            .annotated(AnnotationInstance::new(annotations::UNION)),
        ClassInfo::new("com.example.Book")
            .implements("com.example.SearchResult")
            .field(field("title", string())),
        ClassInfo::new("com.example.Author")
            .implements("com.example.SearchResult")
            .field(field("name", string())),
        api("com.example.Api")
            .method(query("shapes", list_of(class("com.example.Shape"))))
            .method(query("search", list_of(class("com.example.SearchResult")))),
    ]
}

#[test]
fn interfaces_and_unions_bring_their_implementations() {
    let schema = build(search()).unwrap();

    assert_eq!(sorted(schema.interfaces.keys()), ["Shape"]);
    assert!(schema.contains_interface("Shape"));
    assert!(schema.contains_union("SearchResult"));
    assert!(!schema.contains_type("Shape"));
    assert_eq!(
        sorted(schema.types.keys()),
        ["Author", "Book", "Circle", "Square"]
    );
    let interfaces: Vec<_> = schema.types["Square"]
        .interfaces
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(interfaces, ["Shape"]);
    let members: Vec<_> = schema.unions["SearchResult"]
        .members
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(members, ["Book", "Author"]);
    assert!(schema.dangling_references().is_empty());
}

#[test]
fn interfaces_cannot_be_used_as_input() {
    let mut classes = search();
    classes.push(
        api("com.example.Drawing").method(
            mutation("draw", string()).parameter(parameter("shape", class("com.example.Shape"))),
        ),
    );
    let error = build(classes).unwrap_err();
    assert_snapshot!(
        error.to_string(),
        @"Unsupported type com.example.Shape for com.example.Drawing.draw(shape): interfaces and unions cannot be used as input"
    );
}
