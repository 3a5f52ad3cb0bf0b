//! Persistence tests: documents written by one manager and read back by
//! another, in every supported format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use ontoloom::axiom::Axiom;
use ontoloom::codec::{self, DocumentFormat, Prefixes};
use ontoloom::config::ManagerConfig;
use ontoloom::error::{CodecError, OntoError};
use ontoloom::manager::OntologyManager;
use ontoloom::ontology::Ontology;
use ontoloom::resource::{Class, DataProperty, Individual, ObjectProperty};

const FORMATS: [DocumentFormat; 3] = [
    DocumentFormat::NTriples,
    DocumentFormat::Turtle,
    DocumentFormat::Json,
];

fn manager(format: DocumentFormat) -> OntologyManager {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    OntologyManager::new(
        ManagerConfig::default()
            .with_format(format)
            .with_prefix("g", "http://autumncode.com/ontologies/genealogy.owl#"),
    )
    .unwrap()
}

/// One axiom of every kind.
fn genealogy(oh: &OntologyManager) -> Ontology {
    let ns = "http://autumncode.com/ontologies/genealogy.owl#";
    let mut o = oh
        .create_ontology("http://autumncode.com/ontologies/genealogy.owl")
        .unwrap();
    let human = Class::new(&format!("{ns}Human")).unwrap();
    let male = Class::new(&format!("{ns}Male")).unwrap();
    let female = Class::new(&format!("{ns}Female")).unwrap();
    let has_father = ObjectProperty::new(&format!("{ns}hasFather")).unwrap();
    let has_mother = ObjectProperty::new(&format!("{ns}hasMother")).unwrap();
    let name = DataProperty::new(&format!("{ns}name")).unwrap();
    let age = DataProperty::new(&format!("{ns}age")).unwrap();
    let living = DataProperty::new(&format!("{ns}living")).unwrap();
    let andrew = Individual::new(&format!("{ns}andrew")).unwrap();
    let jonathan = Individual::new(&format!("{ns}jonathan")).unwrap();

    oh.apply_changes(
        &mut o,
        [
            Axiom::subclass_of(&male, &human),
            Axiom::subclass_of(&female, &human),
            Axiom::disjoint_classes(&male, &female),
            Axiom::some_values_from(&human, &has_father, &male),
            Axiom::some_values_from(&human, &has_mother, &female),
            Axiom::class_assertion(&male, &andrew),
            Axiom::class_assertion(&male, &jonathan),
            Axiom::object_property_assertion(&has_father, &jonathan, &andrew),
            Axiom::data_property_assertion(&name, &jonathan, "Jonathan \"Jon\" Smith"),
            Axiom::data_property_assertion(&age, &jonathan, 42),
            Axiom::data_property_assertion(&age, &andrew, -7i64),
            Axiom::data_property_assertion(&living, &jonathan, true),
        ],
    )
    .unwrap();
    o
}

#[test]
fn round_trip_every_format() {
    for format in FORMATS {
        let writer = manager(format);
        let o = genealogy(&writer);

        let text = writer.save_to_string(&o).unwrap();
        let reader = manager(format);
        let back = reader.load(text.as_bytes()).unwrap();

        assert_eq!(back.iri(), o.iri(), "{format}");
        assert_eq!(back, o, "{format}: {text}");
    }
}

#[test]
fn vocabulary_classes_and_punned_iris_round_trip() {
    let ns = "http://example.com/p.owl#";
    let thing = Class::new("http://www.w3.org/2002/07/owl#Thing").unwrap();
    let ontology_class = Class::new("http://www.w3.org/2002/07/owl#Ontology").unwrap();
    let species = Class::new(&format!("{ns}Species")).unwrap();
    // Eagle is both a class and an individual of Species.
    let eagle_class = Class::new(&format!("{ns}Eagle")).unwrap();
    let eagle = Individual::new(&format!("{ns}Eagle")).unwrap();
    let sam = Individual::new(&format!("{ns}sam")).unwrap();
    let x = Individual::new(&format!("{ns}x")).unwrap();

    for format in FORMATS {
        let writer = manager(format);
        let mut o = writer.create_ontology("http://example.com/p.owl").unwrap();
        writer
            .apply_changes(
                &mut o,
                [
                    Axiom::class_assertion(&thing, &x),
                    Axiom::class_assertion(&ontology_class, &x),
                    Axiom::class_assertion(&species, &eagle),
                    Axiom::class_assertion(&eagle_class, &sam),
                    Axiom::subclass_of(&eagle_class, &thing),
                ],
            )
            .unwrap();

        let text = writer.save_to_string(&o).unwrap();
        let back = manager(format).load(text.as_bytes()).unwrap();
        assert_eq!(back.iri().as_str(), "http://example.com/p.owl", "{format}");
        assert_eq!(back, o, "{format}: {text}");
    }
}

#[test]
fn empty_ontology_round_trips() {
    for format in FORMATS {
        let writer = manager(format);
        let o = writer
            .create_ontology("http://autumncode.com/ontologies/2015/example.owl")
            .unwrap();
        let text = writer.save_to_string(&o).unwrap();

        let back = manager(format).load(text.as_bytes()).unwrap();
        assert_eq!(
            back.iri().as_str(),
            "http://autumncode.com/ontologies/2015/example.owl"
        );
        assert!(back.is_empty());
    }
}

#[test]
fn one_direction_disjointness_survives() {
    let oh = manager(DocumentFormat::Turtle);
    let mut o = oh.create_ontology("http://example.com/d.owl").unwrap();
    let a = Class::new("http://example.com/d.owl#A").unwrap();
    let b = Class::new("http://example.com/d.owl#B").unwrap();
    oh.add_axiom(&mut o, Axiom::disjoint_classes(&b, &a)).unwrap();

    let bytes = codec::to_bytes(&o, DocumentFormat::Turtle, &Prefixes::new()).unwrap();
    let back = codec::from_bytes(&bytes, DocumentFormat::Turtle).unwrap();
    assert!(back.contains(&Axiom::disjoint_classes(&b, &a)));
    assert!(!back.contains(&Axiom::disjoint_classes(&a, &b)));
}

#[test]
fn turtle_output_uses_configured_prefix() {
    let oh = manager(DocumentFormat::Turtle);
    let o = genealogy(&oh);
    let text = oh.save_to_string(&o).unwrap();
    assert!(text.contains("@prefix g:"));
    assert!(text.contains("owl:Ontology"));
}

#[test]
fn file_persistence_with_tempfile() {
    let dir = tempfile::TempDir::new().unwrap();

    for format in FORMATS {
        let path = dir.path().join(format!("genealogy.{}", format.extension()));
        let writer = manager(format);
        let o = genealogy(&writer);
        {
            let mut out = BufWriter::new(File::create(&path).unwrap());
            writer.save(&o, &mut out).unwrap();
            out.flush().unwrap();
        }

        let ext = path.extension().unwrap().to_str().unwrap();
        let detected = DocumentFormat::from_extension(ext).unwrap();
        let back = manager(format)
            .load_as(BufReader::new(File::open(&path).unwrap()), detected)
            .unwrap();
        assert_eq!(back, o);
    }
}

#[test]
fn read_handwritten_turtle_document() {
    let doc = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix : <http://autumncode.com/ontologies/2015/example1.owl#> .

<http://autumncode.com/ontologies/2015/example1.owl> rdf:type owl:Ontology ;
    rdfs:comment "A small example ontology" .

:Person a owl:Class .
:Fireman a owl:Class ;
    rdfs:subClassOf :Person .
:Kirk a owl:NamedIndividual , :Fireman .
"#;
    let oh = manager(DocumentFormat::Turtle);
    let o = oh.load(doc.as_bytes()).unwrap();

    assert_eq!(
        o.iri().as_str(),
        "http://autumncode.com/ontologies/2015/example1.owl"
    );
    let ns = "http://autumncode.com/ontologies/2015/example1.owl#";
    let person = Class::new(&format!("{ns}Person")).unwrap();
    let fireman = Class::new(&format!("{ns}Fireman")).unwrap();
    let kirk = Individual::new(&format!("{ns}Kirk")).unwrap();
    assert!(o.contains(&Axiom::subclass_of(&fireman, &person)));
    assert!(o.contains(&Axiom::class_assertion(&fireman, &kirk)));
    assert_eq!(o.axiom_count(), 2);
}

#[test]
fn loading_twice_into_one_manager_fails() {
    let writer = manager(DocumentFormat::NTriples);
    let o = genealogy(&writer);
    let text = writer.save_to_string(&o).unwrap();

    let reader = manager(DocumentFormat::NTriples);
    reader.load(text.as_bytes()).unwrap();
    assert!(matches!(
        reader.load(text.as_bytes()),
        Err(OntoError::Ontology(_))
    ));
}

#[test]
fn malformed_documents_are_parse_errors() {
    let oh = manager(DocumentFormat::Turtle);
    for format in FORMATS {
        let err = oh.load_as("this is { not a document".as_bytes(), format).unwrap_err();
        assert!(
            matches!(err, OntoError::Codec(CodecError::Parse { .. })),
            "{format}: {err}"
        );
    }
    assert!(oh.registry().is_empty());
}

/// A sink that refuses every write.
struct ReadOnlySink;

impl Write for ReadOnlySink {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only sink",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn unwritable_sink_is_storage_error() {
    for format in FORMATS {
        let oh = manager(format);
        let o = genealogy(&oh);
        let err = oh.save(&o, ReadOnlySink).unwrap_err();
        assert!(
            matches!(err, OntoError::Codec(CodecError::Storage { .. })),
            "{format}: {err}"
        );
    }
}
