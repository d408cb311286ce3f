use thiserror::Error;

use super::config::ConfigError;
use super::store::StoreError;
use crate::core::coiled_coil::analysis::GeometryError;
use crate::core::forcefield::parameterization::ParameterizationError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::forcefield::scoring::ScoringError;
use crate::core::io::pdb::PdbError;
use crate::core::packing::packer::PackingError;
use crate::core::parameters::ParameterError;

/// Everything a build can report to its caller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Undefined geometry: {0}")]
    UndefinedGeometry(#[from] GeometryError),

    #[error("Build store unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    #[error("Side-chain packing failed: {0}")]
    Packing(PackingError),

    #[error("Forcefield could not be loaded: {source}")]
    Forcefield {
        #[from]
        source: ParamLoadError,
    },

    #[error("Parameterization failed: {0}")]
    Parameterization(#[from] ParameterizationError),

    #[error("Energy scoring failed: {source}")]
    Scoring {
        #[from]
        source: ScoringError,
    },

    #[error("Structure encoding failed: {0}")]
    Encoding(#[from] PdbError),

    #[error("Build was cancelled before stage '{stage}'")]
    Cancelled { stage: &'static str },
}

impl From<PackingError> for BuildError {
    fn from(error: PackingError) -> Self {
        match error {
            PackingError::InvalidParameter(inner) => Self::InvalidParameter(inner),
            other => Self::Packing(other),
        }
    }
}

impl BuildError {
    /// True for the conditions caused by the request itself rather than by
    /// the system serving it.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::UndefinedGeometry(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_parameter_errors_surface_as_invalid_parameter() {
        let error: BuildError = PackingError::InvalidParameter(ParameterError::ChainCountMismatch {
            expected: 2,
            found: 1,
        })
        .into();
        assert!(matches!(
            error,
            BuildError::InvalidParameter(ParameterError::ChainCountMismatch { .. })
        ));
        assert!(error.is_caller_error());
    }

    #[test]
    fn other_packing_errors_stay_packing_errors() {
        let error: BuildError = PackingError::Internal("boom".to_string()).into();
        assert!(matches!(error, BuildError::Packing(_)));
        assert!(!error.is_caller_error());
    }

    #[test]
    fn undefined_geometry_is_distinct_from_invalid_parameter() {
        let error: BuildError = GeometryError::UndefinedMean.into();
        assert!(matches!(error, BuildError::UndefinedGeometry(_)));
        assert!(error.to_string().starts_with("Undefined geometry"));
    }
}
