//! ## Usage
//!
//! This crate builds the model of a GraphQL schema from an index of annotated declarations.
//! Entry points are the classes carrying `GraphQLApi`; their query, mutation and subscription
//! methods become operations, and every type they reach, directly or transitively, is added to
//! the schema exactly once.
//!
//! ```
//! use schema_builder::Config;
//! use schema_builder::index::AnnotationInstance;
//! use schema_builder::index::ClassInfo;
//! use schema_builder::index::Index;
//! use schema_builder::index::MethodInfo;
//! use schema_builder::index::TypeSignature;
//!
//! let index = Index::new([
//!     ClassInfo::new("com.example.Book"),
//!     ClassInfo::new("com.example.BookApi")
//!         .annotated(AnnotationInstance::new("GraphQLApi"))
//!         .method(
//!             MethodInfo::new("book", TypeSignature::class("com.example.Book"))
//!                 .annotated(AnnotationInstance::new("Query")),
//!         ),
//! ]);
//! let schema = schema_builder::build(&index, &Config::default()).unwrap();
//! assert!(schema.contains_type("Book"));
//! ```
//!
//! ## Federation
//!
//! With federation enabled in the [`Config`], the directives declared in the federation package
//! are added to the schema and the `@link` applications on the schema decide their names: see
//! [`link::LinkResolver`].

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

pub mod annotations;
mod builder;
pub mod config;
mod creator;
pub mod error;
mod helper;
pub mod index;
pub mod link;
pub mod model;

pub use crate::builder::build;
pub use crate::config::Config;
pub use crate::creator::ReferenceRegistry;
pub use crate::error::SchemaBuilderError;
pub use crate::index::Index;
pub use crate::index::SymbolIndex;
pub use crate::model::Schema;
