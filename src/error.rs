use thiserror::Error;

/// Application error taxonomy
///
/// Upstream blocks (403, challenge page without a data table) are not errors:
/// they are escalation signals handled inside the fetch orchestrator and never
/// reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The identifier could not be brought into canonical form
    #[error("RUT inválido")]
    InvalidRut,

    /// Both tiers ran but the final HTML carried no usable row
    #[error("No se encontraron filas <tr> con columnas <td> en la respuesta")]
    ExtractionEmpty,

    /// The headless rendering engine is not provisioned in this runtime
    #[error(
        "No se pudo iniciar Chromium para el tier de navegador: {reason}. \
         Instala Chromium/Chrome en el entorno o define CHROME_EXECUTABLE \
         apuntando al binario."
    )]
    EngineUnavailable { reason: String },

    /// The browser launched but rendering the page failed
    #[error("Fallo del navegador al renderizar la página: {0}")]
    Browser(String),
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
