#![forbid(unsafe_code)]

//! The IDP product tour.
//!
//! Fourteen steps across the five main routes. Locators use the
//! `data-tour-target` attribute the pages render on their anchor elements.

use crate::catalog::{Prerequisite, TourStep};

// ═══════════════════════════════════════════════════════════════════════════
// Locators
// ═══════════════════════════════════════════════════════════════════════════

pub const NAV_LINKS: &str = "[data-tour-target=nav-links]";
pub const NAV_EXTRACT: &str = "[data-tour-target=nav-extract]";
pub const UPLOAD: &str = "[data-tour-target=idp-upload]";
pub const RESULTS_MAIN: &str = "[data-tour-target=idp-results-main]";
pub const NAV_CHAT_DOC: &str = "[data-tour-target=nav-chat-doc]";
pub const CHAT_DOC_INPUT: &str = "[data-tour-target=idp-chat-doc-input]";
pub const CHAT_DOC_ANSWER: &str = "[data-tour-target=idp-chat-doc-answer]";
pub const NAV_CHAT_DB: &str = "[data-tour-target=nav-chat-db]";
pub const CHAT_DB_FORM: &str = "[data-tour-target=idp-chat-db-form]";
pub const CHAT_DB_ANSWER: &str = "[data-tour-target=idp-chat-db-answer]";
pub const NAV_CHARTS: &str = "[data-tour-target=nav-charts]";
pub const CHARTS_FORM: &str = "[data-tour-target=idp-charts-form]";
pub const CHARTS_RESULT: &str = "[data-tour-target=idp-charts-result]";
pub const NAV_TOKENS: &str = "[data-tour-target=nav-tokens]";

// ═══════════════════════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════════════════════

pub const ROUTE_HOME: &str = "/";
pub const ROUTE_EXTRACT: &str = "/extract";
pub const ROUTE_CHAT_DOC: &str = "/chat-doc";
pub const ROUTE_CHAT_DB: &str = "/chat-db";
pub const ROUTE_CHARTS: &str = "/charts";

const RESULTS_PENDING: &str = "Aun no se ha procesado un archivo. Sube un contrato en Extraccion \
     y espera a que termine; luego veras los resultados aqui.";
const CHAT_DOC_PENDING: &str =
    "Primero procesa un contrato en Extraccion. Luego podras chatear con el contrato desde esta caja.";

/// Build the default step list.
pub fn idp_steps() -> Vec<TourStep> {
    vec![
        TourStep::new(
            NAV_LINKS,
            "Controles principales",
            "Accede a las diferentes funcionalidades de la aplicacion",
        )
        .key("header")
        .route(ROUTE_HOME),
        TourStep::new(NAV_EXTRACT, "Extraccion", "Sube contratos y extrae datos en JSON.")
            .key("extract")
            .route(ROUTE_EXTRACT),
        TourStep::new(
            UPLOAD,
            "Subida de contratos",
            "Selecciona PDFs o imagenes, agrega un prompt y procesa.",
        )
        .key("upload")
        .route(ROUTE_EXTRACT),
        TourStep::new(
            RESULTS_MAIN,
            "Resultados extraidos",
            "Aqui veras los valores de pago y datos clave del contrato.",
        )
        .key("results")
        .route(ROUTE_EXTRACT)
        .requires(Prerequisite::ProcessedResult, RESULTS_PENDING),
        TourStep::new(
            NAV_CHAT_DOC,
            "Chat con contrato",
            "Pregunta en lenguaje natural sobre el contrato procesado.",
        )
        .key("chatdoc")
        .route(ROUTE_CHAT_DOC),
        TourStep::new(
            CHAT_DOC_INPUT,
            "Escribe tu pregunta",
            "Formula la pregunta y envia; cada consulta consume tokens.",
        )
        .key("chatdoc-input")
        .route(ROUTE_CHAT_DOC)
        .requires(Prerequisite::ExtractedText, CHAT_DOC_PENDING),
        TourStep::new(
            CHAT_DOC_ANSWER,
            "Respuesta del contrato",
            "Aqui se mostrara la respuesta de la IA sobre el contrato.",
        )
        .key("chatdoc-answer")
        .route(ROUTE_CHAT_DOC),
        TourStep::new(
            NAV_CHAT_DB,
            "Chat base de datos",
            "Consulta Azure SQL en lenguaje natural.",
        )
        .key("chatdb")
        .route(ROUTE_CHAT_DB),
        TourStep::new(
            CHAT_DB_FORM,
            "Consulta la base",
            "Ingresa tu pregunta; el asistente genera el SQL y muestra la respuesta.",
        )
        .key("chatdb-form")
        .route(ROUTE_CHAT_DB),
        TourStep::new(
            CHAT_DB_ANSWER,
            "Respuesta de la base",
            "Aqui veras la respuesta del asistente sobre los datos.",
        )
        .key("chatdb-answer")
        .route(ROUTE_CHAT_DB),
        TourStep::new(
            NAV_CHARTS,
            "Graficas",
            "Genera visualizaciones ejecutivas a partir de prompts.",
        )
        .key("charts")
        .route(ROUTE_CHARTS),
        TourStep::new(
            CHARTS_FORM,
            "Crear grafica",
            "Describe la grafica que necesitas y genera la imagen.",
        )
        .key("charts-form")
        .route(ROUTE_CHARTS),
        TourStep::new(
            CHARTS_RESULT,
            "Resultado de grafica",
            "Aqui se previsualiza la grafica generada por la IA.",
        )
        .key("charts-result")
        .route(ROUTE_CHARTS),
        TourStep::new(
            NAV_TOKENS,
            "Tokens",
            "Monitorea tus creditos y solicita mas si se agotan.",
        )
        .key("tokens")
        .route(ROUTE_HOME),
    ]
}
