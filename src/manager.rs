//! Manager facade: the top-level API for building, persisting and reasoning
//! over ontologies.
//!
//! An [`OntologyManager`] owns the configuration, the identity registry that
//! keeps ontology IRIs unique, the change applier and the reasoner factory.
//! Managers are independent values: two managers never see each other's
//! registrations.

use std::io::{Read, Write};

use crate::axiom::Axiom;
use crate::change::{ChangeApplier, ChangeSummary, OntologyChange};
use crate::codec::{self, DocumentFormat};
use crate::config::ManagerConfig;
use crate::error::{CodecError, OntoResult};
use crate::ontology::Ontology;
use crate::reason::{
    self, ReasonerFactory, ReasonerSession, ReasoningOutcome, StructuralReasonerFactory,
};
use crate::registry::{OntologyRegistry, Origin};
use crate::resource::Iri;

/// Owns every subsystem and hands out ontologies.
pub struct OntologyManager {
    config: ManagerConfig,
    registry: OntologyRegistry,
    applier: ChangeApplier,
    reasoner_factory: Box<dyn ReasonerFactory + Send + Sync>,
}

impl OntologyManager {
    /// Create a manager with the given configuration.
    pub fn new(config: ManagerConfig) -> OntoResult<Self> {
        config.validate()?;

        tracing::info!(
            format = %config.document_format,
            validation = ?config.validation,
            prefixes = config.prefixes.len(),
            "initializing ontology manager"
        );

        Ok(Self {
            applier: ChangeApplier::with_policy(config.validation),
            registry: OntologyRegistry::new(),
            reasoner_factory: Box::new(StructuralReasonerFactory),
            config,
        })
    }

    /// Replace the reasoner factory used by [`Self::reasoner`] and [`Self::reason`].
    pub fn with_reasoner_factory(
        mut self,
        factory: impl ReasonerFactory + Send + Sync + 'static,
    ) -> Self {
        self.reasoner_factory = Box::new(factory);
        self
    }

    /// Create an empty ontology. Fails if the IRI is already registered.
    pub fn create_ontology(&self, iri: &str) -> OntoResult<Ontology> {
        let iri = Iri::parse(iri)?;
        self.registry.register(&iri, Origin::Created)?;
        tracing::info!(ontology = %iri, "created ontology");
        Ok(Ontology::new(iri))
    }

    /// Apply an ordered batch of changes.
    pub fn apply_changes<I, C>(&self, ontology: &mut Ontology, batch: I) -> OntoResult<ChangeSummary>
    where
        I: IntoIterator<Item = C>,
        C: Into<OntologyChange>,
    {
        Ok(self.applier.apply(ontology, batch)?)
    }

    /// Add a single axiom. A no-op if already present.
    pub fn add_axiom(&self, ontology: &mut Ontology, axiom: Axiom) -> OntoResult<ChangeSummary> {
        self.apply_changes(ontology, [OntologyChange::AddAxiom(axiom)])
    }

    /// Remove a single axiom. A no-op if absent.
    pub fn remove_axiom(&self, ontology: &mut Ontology, axiom: Axiom) -> OntoResult<ChangeSummary> {
        self.apply_changes(ontology, [OntologyChange::RemoveAxiom(axiom)])
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write `ontology` in the configured document format.
    pub fn save<W: Write>(&self, ontology: &Ontology, writer: W) -> OntoResult<()> {
        self.save_as(ontology, self.config.document_format, writer)
    }

    /// Write `ontology` in an explicit document format.
    pub fn save_as<W: Write>(
        &self,
        ontology: &Ontology,
        format: DocumentFormat,
        writer: W,
    ) -> OntoResult<()> {
        codec::encode(ontology, format, &self.config.prefixes, writer)?;
        tracing::debug!(ontology = %ontology.iri(), %format, "saved ontology");
        Ok(())
    }

    /// Render `ontology` as a document string in the configured format.
    pub fn save_to_string(&self, ontology: &Ontology) -> OntoResult<String> {
        let bytes = codec::to_bytes(ontology, self.config.document_format, &self.config.prefixes)?;
        String::from_utf8(bytes).map_err(|e| {
            CodecError::Storage {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
            .into()
        })
    }

    /// Read and register an ontology in the configured document format.
    pub fn load<R: Read>(&self, reader: R) -> OntoResult<Ontology> {
        self.load_as(reader, self.config.document_format)
    }

    /// Read and register an ontology. Fails if its IRI is already registered.
    pub fn load_as<R: Read>(&self, reader: R, format: DocumentFormat) -> OntoResult<Ontology> {
        let ontology = codec::decode(reader, format)?;
        self.registry.register(ontology.iri(), Origin::Loaded)?;
        tracing::info!(
            ontology = %ontology.iri(),
            %format,
            axioms = ontology.axiom_count(),
            "loaded ontology"
        );
        Ok(ontology)
    }

    // -----------------------------------------------------------------------
    // Reasoning
    // -----------------------------------------------------------------------

    /// Open a reasoner session over `ontology`; disposed when dropped.
    pub fn reasoner<'a>(&self, ontology: &'a Ontology) -> ReasonerSession<'a> {
        ReasonerSession::new(self.reasoner_factory.as_ref(), ontology)
    }

    /// Consistency plus full classification in one call.
    pub fn reason(&self, ontology: &Ontology) -> ReasoningOutcome {
        reason::reason(self.reasoner_factory.as_ref(), ontology)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The configuration this manager was built with.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Ontology IRIs registered with this manager.
    pub fn registry(&self) -> &OntologyRegistry {
        &self.registry
    }

    /// Summary of the manager state.
    pub fn info(&self) -> ManagerInfo {
        ManagerInfo {
            document_format: self.config.document_format,
            validation: format!("{:?}", self.config.validation),
            reasoner: self.reasoner_factory.name().to_string(),
            ontologies: self.registry.len(),
        }
    }
}

impl Default for OntologyManager {
    fn default() -> Self {
        let config = ManagerConfig::default();
        Self {
            applier: ChangeApplier::with_policy(config.validation),
            registry: OntologyRegistry::new(),
            reasoner_factory: Box::new(StructuralReasonerFactory),
            config,
        }
    }
}

/// Manager summary.
#[derive(Debug, Clone)]
pub struct ManagerInfo {
    /// Default document format.
    pub document_format: DocumentFormat,
    /// Validation policy name.
    pub validation: String,
    /// Reasoner factory name.
    pub reasoner: String,
    /// Number of registered ontologies.
    pub ontologies: usize,
}

impl std::fmt::Display for ManagerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ontology manager")?;
        writeln!(f, "  format:      {}", self.document_format)?;
        writeln!(f, "  validation:  {}", self.validation)?;
        writeln!(f, "  reasoner:    {}", self.reasoner)?;
        writeln!(f, "  ontologies:  {}", self.ontologies)?;
        Ok(())
    }
}

impl std::fmt::Debug for OntologyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("reasoner", &self.reasoner_factory.name())
            .finish()
    }
}
