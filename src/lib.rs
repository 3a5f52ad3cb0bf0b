// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ontoloom
//!
//! Build, change, persist and reason over small in-memory OWL ontologies.
//!
//! ## Architecture
//!
//! - **Resources** (`resource`): validated IRIs and typed handles for classes,
//!   individuals and properties
//! - **Axioms** (`axiom`): the six supported axiom kinds and their literals
//! - **Ontology store** (`ontology`): deduplicated, insertion-ordered axiom sets
//! - **Changes** (`change`): ordered add/remove batches with validation and rollback
//! - **Codec** (`codec`): N-Triples and Turtle via oxigraph, plus JSON
//! - **Reasoning** (`reason`): scoped reasoner sessions and a structural reasoner
//! - **Manager** (`manager`): the explicit registry and facade tying it together
//!
//! ## Library usage
//!
//! ```no_run
//! use ontoloom::axiom::Axiom;
//! use ontoloom::config::ManagerConfig;
//! use ontoloom::manager::OntologyManager;
//! use ontoloom::reason::Reasoner;
//! use ontoloom::resource::{Class, Individual};
//!
//! let manager = OntologyManager::new(ManagerConfig::default()).unwrap();
//! let mut o = manager
//!     .create_ontology("http://autumncode.com/ontologies/person.owl")
//!     .unwrap();
//!
//! let person = Class::new("http://autumncode.com/ontologies/person.owl#Person").unwrap();
//! let fireman = Class::new("http://autumncode.com/ontologies/person.owl#Fireman").unwrap();
//! let kirk = Individual::new("http://autumncode.com/ontologies/person.owl#Kirk").unwrap();
//!
//! manager
//!     .apply_changes(
//!         &mut o,
//!         [
//!             Axiom::subclass_of(&fireman, &person),
//!             Axiom::class_assertion(&fireman, &kirk),
//!         ],
//!     )
//!     .unwrap();
//!
//! let session = manager.reasoner(&o);
//! assert!(session.instances_of(&person, true).unwrap().contains(&kirk));
//! println!("{}", manager.save_to_string(&o).unwrap());
//! ```

pub mod axiom;
pub mod change;
pub mod codec;
pub mod config;
pub mod error;
pub mod manager;
pub mod ontology;
pub mod reason;
pub mod registry;
pub mod resource;
