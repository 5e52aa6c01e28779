//! Translation lookup and the supported language catalogue.
//!
//! DESIGN
//! ======
//! The language set is closed: anything outside it resolves to
//! [`LanguageCode::DEFAULT`]. Lookups are total over [`TranslationKey`] and
//! fall back to the default language when a table lacks an entry, so callers
//! never handle a missing string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// LANGUAGE CODE
// =============================================================================

/// A supported guest language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageCode {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ru,
    He,
}

impl LanguageCode {
    pub const DEFAULT: Self = Self::En;

    /// Every supported language, in picker order.
    pub const ALL: [Self; 8] = [Self::En, Self::Es, Self::Fr, Self::De, Self::It, Self::Pt, Self::Ru, Self::He];

    /// Two-letter wire code (e.g. `"es"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ru => "ru",
            Self::He => "he",
        }
    }

    /// English display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::It => "Italian",
            Self::Pt => "Portuguese",
            Self::Ru => "Russian",
            Self::He => "Hebrew",
        }
    }

    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Self::En => "🇺🇸",
            Self::Es => "🇪🇸",
            Self::Fr => "🇫🇷",
            Self::De => "🇩🇪",
            Self::It => "🇮🇹",
            Self::Pt => "🇵🇹",
            Self::Ru => "🇷🇺",
            Self::He => "🇮🇱",
        }
    }

    /// Parse a raw code, falling back to the default language.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::DEFAULT)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0:?}")]
pub struct UnknownLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl Serialize for LanguageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// Unknown codes deserialize to the default language instead of failing.
impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_or_default(&raw))
    }
}

/// Languages to offer in a picker for a hotel.
///
/// A non-empty hotel list filters the catalogue (keeping catalogue order and
/// dropping codes we do not support); an empty list offers everything.
#[must_use]
pub fn available_languages(hotel_languages: &[String]) -> Vec<LanguageCode> {
    if hotel_languages.is_empty() {
        return LanguageCode::ALL.to_vec();
    }
    LanguageCode::ALL
        .into_iter()
        .filter(|lang| hotel_languages.iter().any(|code| code == lang.code()))
        .collect()
}

// =============================================================================
// TRANSLATIONS
// =============================================================================

/// Keys of the UI string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    Welcome,
    Name,
    RoomNumber,
    Language,
    StartChat,
    AiDisclaimer,
    GreetNameRoom,
    InitialGreeting,
    TypeMessage,
    Send,
}

impl TranslationKey {
    pub const ALL: [Self; 10] = [
        Self::Welcome,
        Self::Name,
        Self::RoomNumber,
        Self::Language,
        Self::StartChat,
        Self::AiDisclaimer,
        Self::GreetNameRoom,
        Self::InitialGreeting,
        Self::TypeMessage,
        Self::Send,
    ];
}

/// Look up `key` in `language`. Every supported language carries every key;
/// codes outside the catalogue resolve to the default language in
/// [`translate`].
#[must_use]
pub fn get_translation(language: LanguageCode, key: TranslationKey) -> &'static str {
    table(language)(key)
}

/// Look up `key` for a raw language code. Unsupported codes use the default language.
#[must_use]
pub fn translate(raw_language: &str, key: TranslationKey) -> &'static str {
    get_translation(LanguageCode::parse_or_default(raw_language), key)
}

/// Substitute the first occurrence of each `{name}` placeholder.
#[must_use]
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replacen(&format!("{{{name}}}"), value, 1);
    }
    out
}

/// Every table is total over `TranslationKey`.
type Table = fn(TranslationKey) -> &'static str;

fn table(language: LanguageCode) -> Table {
    match language {
        LanguageCode::En => english,
        LanguageCode::Es => spanish,
        LanguageCode::Fr => french,
        LanguageCode::De => german,
        LanguageCode::It => italian,
        LanguageCode::Pt => portuguese,
        LanguageCode::Ru => russian,
        LanguageCode::He => hebrew,
    }
}

fn english(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Welcome to our hotel",
        Name => "Name",
        RoomNumber => "Room Number",
        Language => "Language",
        StartChat => "Start Chat",
        AiDisclaimer => {
            "This is an AI assistant and may make mistakes. Each message is handled separately for simplicity."
        }
        GreetNameRoom => "Hello {name} from room {roomNumber}.",
        InitialGreeting => {
            "Welcome to {hotelName}. I'm here to help you with any requests, questions, or services you need during your stay. Each message is being handled separately for simplicity for now."
        }
        TypeMessage => "Type your message...",
        Send => "Send",
    }
}

fn spanish(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Bienvenido a nuestro hotel",
        Name => "Nombre",
        RoomNumber => "Número de habitación",
        Language => "Idioma",
        StartChat => "Iniciar chat",
        AiDisclaimer => {
            "Este es un asistente de IA y puede cometer errores. Cada mensaje se maneja por separado para simplificar."
        }
        GreetNameRoom => "Hola {name} de la habitación {roomNumber}.",
        InitialGreeting => {
            "Bienvenido a {hotelName}. Estoy aquí para ayudarte con cualquier solicitud, pregunta o servicio que necesites durante tu estancia. Cada mensaje se maneja por separado por simplicidad por ahora."
        }
        TypeMessage => "Escribe tu mensaje...",
        Send => "Enviar",
    }
}

fn french(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Bienvenue dans notre hôtel",
        Name => "Nom",
        RoomNumber => "Numéro de chambre",
        Language => "Langue",
        StartChat => "Commencer le chat",
        AiDisclaimer => {
            "Ceci est un assistant IA et peut faire des erreurs. Chaque message est traité séparément pour simplifier."
        }
        GreetNameRoom => "Bonjour {name} de la chambre {roomNumber}.",
        InitialGreeting => {
            "Bienvenue à {hotelName}. Je suis là pour vous aider avec toute demande, question ou service dont vous avez besoin pendant votre séjour. Chaque message est traité séparément pour l'instant pour simplifier."
        }
        TypeMessage => "Tapez votre message...",
        Send => "Envoyer",
    }
}

fn german(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Willkommen in unserem Hotel",
        Name => "Name",
        RoomNumber => "Zimmernummer",
        Language => "Sprache",
        StartChat => "Chat starten",
        AiDisclaimer => {
            "Dies ist ein KI-Assistent und kann Fehler machen. Jede Nachricht wird zur Vereinfachung separat behandelt."
        }
        GreetNameRoom => "Hallo {name} aus Zimmer {roomNumber}.",
        InitialGreeting => {
            "Willkommen im {hotelName}. Ich bin hier, um Ihnen bei allen Anfragen, Fragen oder Dienstleistungen zu helfen, die Sie während Ihres Aufenthalts benötigen. Jede Nachricht wird zur Vereinfachung vorerst separat behandelt."
        }
        TypeMessage => "Geben Sie Ihre Nachricht ein...",
        Send => "Senden",
    }
}

fn italian(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Benvenuto nel nostro hotel",
        Name => "Nome",
        RoomNumber => "Numero camera",
        Language => "Lingua",
        StartChat => "Inizia chat",
        AiDisclaimer => {
            "Questo è un assistente IA e può commettere errori. Ogni messaggio è gestito separatamente per semplicità."
        }
        GreetNameRoom => "Ciao {name} della stanza {roomNumber}.",
        InitialGreeting => {
            "Benvenuto al {hotelName}. Sono qui per aiutarti con qualsiasi richiesta, domanda o servizio di cui hai bisogno durante il tuo soggiorno. Ogni messaggio viene gestito separatamente per ora per semplicità."
        }
        TypeMessage => "Digita il tuo messaggio...",
        Send => "Invia",
    }
}

fn portuguese(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Bem-vindo ao nosso hotel",
        Name => "Nome",
        RoomNumber => "Número do quarto",
        Language => "Idioma",
        StartChat => "Iniciar chat",
        AiDisclaimer => {
            "Este é um assistente de IA e pode cometer erros. Cada mensagem é tratada separadamente para simplicidade."
        }
        GreetNameRoom => "Olá {name} do quarto {roomNumber}.",
        InitialGreeting => {
            "Bem-vindo ao {hotelName}. Estou aqui para ajudá-lo com qualquer solicitação, pergunta ou serviço que você precise durante sua estadia. Cada mensagem é tratada separadamente por ora para simplicidade."
        }
        TypeMessage => "Digite sua mensagem...",
        Send => "Enviar",
    }
}

fn russian(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "Добро пожаловать в наш отель",
        Name => "Имя",
        RoomNumber => "Номер комнаты",
        Language => "Язык",
        StartChat => "Начать чат",
        AiDisclaimer => {
            "Это ИИ-помощник, который может совершать ошибки. Каждое сообщение обрабатывается отдельно для упрощения."
        }
        GreetNameRoom => "Здравствуйте, {name} из номера {roomNumber}.",
        InitialGreeting => {
            "Добро пожаловать в {hotelName}. Я здесь, чтобы помочь вам с любыми запросами, вопросами или услугами, которые вам нужны во время вашего пребывания. Каждое сообщение пока обрабатывается отдельно для упрощения."
        }
        TypeMessage => "Введите ваше сообщение...",
        Send => "Отправить",
    }
}

fn hebrew(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Welcome => "ברוכים הבאים למלון שלנו",
        Name => "שם",
        RoomNumber => "מספר חדר",
        Language => "שפה",
        StartChat => "התחל צ'אט",
        AiDisclaimer => "זהו עוזר בינה מלאכותית והוא עלול לעשות טעויות. כל הודעה מטופלת בנפרד לפשטות.",
        GreetNameRoom => "שלום {name} מחדר {roomNumber}.",
        InitialGreeting => {
            "ברוכים הבאים ל{hotelName}. אני כאן כדי לעזור לכם עם כל בקשה, שאלה או שירות שאתם צריכים במהלך השהייה שלכם. כל הודעה מטופלת בנפרד לעת עתה לפשטות."
        }
        TypeMessage => "הקלידו את ההודעה שלכם...",
        Send => "שלח",
    }
}

#[cfg(test)]
#[path = "i18n_test.rs"]
mod tests;
