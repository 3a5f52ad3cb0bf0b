//! Resource identity: IRIs and typed resource handles.
//!
//! Every class, individual and property is identified by an [`Iri`] and a
//! [`ResourceKind`]. Identity is by value: creating the same resource twice
//! yields two values that compare equal and are interchangeable in every axiom.
//! The typed handles ([`Class`], [`Individual`], [`ObjectProperty`],
//! [`DataProperty`]) let the axiom constructors check operand kinds at compile
//! time; [`Resource`] is the untyped form used for signatures.

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

use crate::error::{OntoResult, ResourceError};

/// A validated absolute IRI.
///
/// The string is stored exactly as supplied; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(String);

impl Iri {
    /// Parse and validate an absolute IRI.
    pub fn parse(iri: impl Into<String>) -> OntoResult<Self> {
        let iri = iri.into();
        match NamedNode::new(iri.as_str()) {
            Ok(_) => Ok(Self(iri)),
            Err(e) => Err(ResourceError::InvalidIdentifier {
                message: e.to_string(),
                iri,
            }
            .into()),
        }
    }

    /// The IRI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this IRI lives under the given namespace prefix.
    pub fn starts_with(&self, namespace: &str) -> bool {
        self.0.starts_with(namespace)
    }

    /// The IRI as an oxigraph node, for the RDF codec.
    pub(crate) fn to_named_node(&self) -> NamedNode {
        NamedNode::new_unchecked(self.0.clone())
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Iri {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Iri::parse(value).map_err(|e| e.to_string())
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

/// Classification of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A named class of individuals.
    Class,
    /// A named individual.
    Individual,
    /// A property relating two individuals.
    ObjectProperty,
    /// A property relating an individual to a literal.
    DataProperty,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Class => write!(f, "Class"),
            ResourceKind::Individual => write!(f, "Individual"),
            ResourceKind::ObjectProperty => write!(f, "ObjectProperty"),
            ResourceKind::DataProperty => write!(f, "DataProperty"),
        }
    }
}

/// An untyped resource: an IRI together with its kind.
///
/// Two resources are equal iff both IRI and kind are equal, so the same IRI
/// may legally name a class and an individual at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource {
    /// Identifier.
    pub iri: Iri,
    /// What kind of resource this is.
    pub kind: ResourceKind,
}

impl Resource {
    /// Create a resource from a validated IRI.
    pub fn new(iri: Iri, kind: ResourceKind) -> Self {
        Self { iri, kind }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(<{}>)", self.kind, self.iri)
    }
}

/// Create a resource from an IRI string and a kind.
///
/// Pure and idempotent: equal inputs always give equal resources. No
/// uniqueness check is performed. Fails only on a malformed IRI.
pub fn resource(iri: &str, kind: ResourceKind) -> OntoResult<Resource> {
    Ok(Resource::new(Iri::parse(iri)?, kind))
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Iri);

        impl $name {
            /// Create a handle from an IRI string.
            pub fn new(iri: &str) -> OntoResult<Self> {
                Ok(Self(Iri::parse(iri)?))
            }

            /// Create a handle from an already validated IRI.
            pub fn from_iri(iri: Iri) -> Self {
                Self(iri)
            }

            /// The identifier of this resource.
            pub fn iri(&self) -> &Iri {
                &self.0
            }

            /// The untyped form of this handle.
            pub fn to_resource(&self) -> Resource {
                Resource::new(self.0.clone(), ResourceKind::$kind)
            }
        }

        impl From<$name> for Resource {
            fn from(handle: $name) -> Self {
                Resource::new(handle.0, ResourceKind::$kind)
            }
        }

        impl TryFrom<Resource> for $name {
            type Error = crate::error::OntoError;

            fn try_from(resource: Resource) -> OntoResult<Self> {
                if resource.kind == ResourceKind::$kind {
                    Ok(Self(resource.iri))
                } else {
                    Err(ResourceError::KindMismatch {
                        iri: resource.iri.to_string(),
                        expected: ResourceKind::$kind.to_string(),
                        actual: resource.kind.to_string(),
                    }
                    .into())
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "<{}>", self.0)
            }
        }
    };
}

typed_handle!(
    /// Handle to a named class.
    Class => Class
);
typed_handle!(
    /// Handle to a named individual.
    Individual => Individual
);
typed_handle!(
    /// Handle to an object property.
    ObjectProperty => ObjectProperty
);
typed_handle!(
    /// Handle to a data property.
    DataProperty => DataProperty
);

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = "http://autumncode.com/ontologies/person.owl#Person";

    #[test]
    fn resource_creation_is_idempotent() {
        let a = resource(PERSON, ResourceKind::Class).unwrap();
        let b = resource(PERSON, ResourceKind::Class).unwrap();
        assert_eq!(a, b);

        let c1 = Class::new(PERSON).unwrap();
        let c2 = Class::new(PERSON).unwrap();
        assert_eq!(c1, c2);
        assert_eq!(c1.to_resource(), a);
    }

    #[test]
    fn kind_is_part_of_identity() {
        let class = resource(PERSON, ResourceKind::Class).unwrap();
        let individual = resource(PERSON, ResourceKind::Individual).unwrap();
        assert_ne!(class, individual);
    }

    #[test]
    fn iri_is_not_normalized() {
        let iri = Iri::parse("HTTP://Example.com/a#B").unwrap();
        assert_eq!(iri.as_str(), "HTTP://Example.com/a#B");
    }

    #[test]
    fn malformed_iri_is_invalid_identifier() {
        for bad in ["", "Person", "http://example.com/with space", "#fragment"] {
            let err = Iri::parse(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    crate::error::OntoError::Resource(ResourceError::InvalidIdentifier { .. })
                ),
                "expected invalid identifier for {bad:?}"
            );
        }
    }

    #[test]
    fn typed_handle_round_trips_through_resource() {
        let class = Class::new(PERSON).unwrap();
        let res: Resource = class.clone().into();
        let back = Class::try_from(res).unwrap();
        assert_eq!(back, class);
    }

    #[test]
    fn converting_to_wrong_handle_is_kind_mismatch() {
        let res = resource(PERSON, ResourceKind::Class).unwrap();
        let err = Individual::try_from(res).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("is a Class, not a Individual"));
    }

    #[test]
    fn display_forms() {
        let res = resource(PERSON, ResourceKind::ObjectProperty).unwrap();
        assert_eq!(res.to_string(), format!("ObjectProperty(<{PERSON}>)"));
        assert_eq!(Class::new(PERSON).unwrap().to_string(), format!("<{PERSON}>"));
    }

    #[test]
    fn iri_serializes_as_plain_string() {
        let class = Class::new(PERSON).unwrap();
        let json = serde_json::to_string(&class).unwrap();
        assert_eq!(json, format!("\"{PERSON}\""));
        let err = serde_json::from_str::<Class>("\"not an iri\"");
        assert!(err.is_err());
    }
}
