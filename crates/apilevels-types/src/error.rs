use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A `<...>`, `(...)` span never closes, or a closing delimiter has no opener.
    ///
    /// Signature extraction is expected to hand over balanced input, so this usually points at
    /// an upstream bug rather than something the caller can recover from.
    #[error("unbalanced `{delimiter}` in type string `{input}`")]
    Unbalanced { input: String, delimiter: char },

    #[error("`{operation}` is not supported in this representation")]
    Unsupported { operation: &'static str },
}

impl TypeError {
    pub(crate) fn unbalanced(input: &str, delimiter: char) -> Self {
        TypeError::Unbalanced {
            input: input.to_owned(),
            delimiter,
        }
    }

    pub(crate) fn unsupported(operation: &'static str) -> Self {
        TypeError::Unsupported { operation }
    }
}
