// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Mensagens de erro traduzidas, indexadas por idioma e chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in CATALOGS {
            let catalog: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de mensagens '{}' inválido", lang))?;
            messages.insert(lang.to_string(), catalog);
        }
        Ok(Self { messages })
    }

    /// Busca a mensagem no idioma pedido, depois no padrão ("en"), e por fim
    /// devolve a própria chave. Placeholders `{nome}` são substituídos.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.messages
                    .get(DEFAULT_LANG)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(String::as_str)
            .unwrap_or(key);

        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let mut en: Vec<_> = store.messages["en"].keys().collect();
        let mut pt: Vec<_> = store.messages["pt"].keys().collect();
        en.sort();
        pt.sort();
        assert_eq!(en, pt);
    }

    #[test]
    fn falls_back_to_default_language_then_key() {
        let store = I18nStore::load().unwrap();

        assert_eq!(
            store.translate("fr", "invalid_credentials", &[]),
            "Invalid e-mail or password."
        );
        assert_eq!(store.translate("pt", "chave_inexistente", &[]), "chave_inexistente");
    }

    #[test]
    fn interpolates_parameters() {
        let store = I18nStore::load().unwrap();
        let text = store.translate("pt", "not_found", &[("detail", "Projeto 42".to_string())]);
        assert_eq!(text, "Projeto 42 não encontrado.");
    }
}
