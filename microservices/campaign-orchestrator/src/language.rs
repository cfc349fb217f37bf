//! Per-language IVR prompt strings.
//!
//! The provider reports the authoritative supported-language list via
//! `GET /languages`; this catalog supplies the spoken prompt fragments for
//! those codes and serves as the fallback list when the provider is
//! unreachable. Unknown codes fall back to English.

/// Prompt fragments for one language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageStrings {
    pub welcome: &'static str,
    pub press: &'static str,
    pub for_info: &'static str,
    pub to_speak_with_agent: &'static str,
    pub invalid_input: &'static str,
    pub goodbye: &'static str,
}

const EN: LanguageStrings = LanguageStrings {
    welcome: "Hello, welcome to our campaign.",
    press: "Press",
    for_info: "for more information",
    to_speak_with_agent: "to speak with an agent",
    invalid_input: "Sorry, that was not a valid option. Please try again.",
    goodbye: "Goodbye!",
};

const ES: LanguageStrings = LanguageStrings {
    welcome: "Hola, bienvenido a nuestra campaña.",
    press: "Presione",
    for_info: "para más información",
    to_speak_with_agent: "para hablar con un agente",
    invalid_input: "Lo sentimos, esa no fue una opción válida. Inténtelo de nuevo.",
    goodbye: "¡Adiós!",
};

const FR: LanguageStrings = LanguageStrings {
    welcome: "Bonjour, bienvenue dans notre campagne.",
    press: "Appuyez sur",
    for_info: "pour plus d'informations",
    to_speak_with_agent: "pour parler à un agent",
    invalid_input: "Désolé, ce n'était pas une option valide. Veuillez réessayer.",
    goodbye: "Au revoir !",
};

const DE: LanguageStrings = LanguageStrings {
    welcome: "Hallo, willkommen zu unserer Kampagne.",
    press: "Drücken Sie",
    for_info: "für weitere Informationen",
    to_speak_with_agent: "um mit einem Mitarbeiter zu sprechen",
    invalid_input: "Entschuldigung, das war keine gültige Option. Bitte versuchen Sie es erneut.",
    goodbye: "Auf Wiedersehen!",
};

const HI: LanguageStrings = LanguageStrings {
    welcome: "नमस्ते, हमारे अभियान में आपका स्वागत है।",
    press: "दबाएं",
    for_info: "अधिक जानकारी के लिए",
    to_speak_with_agent: "एजेंट से बात करने के लिए",
    invalid_input: "क्षमा करें, यह एक वैध विकल्प नहीं था। कृपया पुनः प्रयास करें।",
    goodbye: "अलविदा!",
};

/// Prompt strings for a language code, falling back to English.
pub fn strings_for(code: &str) -> LanguageStrings {
    match code {
        "en" => EN,
        "es" => ES,
        "fr" => FR,
        "de" => DE,
        "hi" => HI,
        _ => EN,
    }
}

/// Human-readable language name for display.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "hi" => "Hindi",
        _ => "English",
    }
}

/// Codes this catalog carries prompts for; used when `GET /languages` is
/// unavailable.
pub fn fallback_languages() -> Vec<String> {
    ["en", "es", "fr", "de", "hi"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
