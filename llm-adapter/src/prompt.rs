//! Named prompt templates with typed variables and localization fallback
//! (§4.2), in the system+user message shape of
//! `mr-reviewer::review::prompt::Prompt`.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone)]
struct TemplateSource {
    system: String,
    user: String,
}

/// A registry of `(template_name, language) -> template source`. Rendering
/// substitutes `{var_name}` placeholders; a variable absent from the map
/// is left as a literal `{var_name}` rather than erroring, since prompt
/// construction must never fail the pipeline (a slightly malformed prompt
/// still produces a usable, if noisier, analyst response).
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    templates: HashMap<(String, String), TemplateSource>,
    reference_language: String,
}

impl PromptLibrary {
    pub fn new(reference_language: impl Into<String>) -> Self {
        Self { templates: HashMap::new(), reference_language: reference_language.into() }
    }

    pub fn register(&mut self, name: &str, language: &str, system: impl Into<String>, user: impl Into<String>) {
        self.templates.insert(
            (name.to_string(), language.to_string()),
            TemplateSource { system: system.into(), user: user.into() },
        );
    }

    /// Renders `name` in `language`, falling back to the reference language
    /// when no translation is registered (§4.2 "missing translations fall
    /// back to the reference language").
    pub fn render(&self, name: &str, language: &str, vars: &HashMap<&str, String>) -> Option<Prompt> {
        let source = self
            .templates
            .get(&(name.to_string(), language.to_string()))
            .or_else(|| self.templates.get(&(name.to_string(), self.reference_language.clone())))?;
        Some(Prompt { system: substitute(&source.system, vars), user: substitute(&source.user, vars) })
    }
}

fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Builds the default English template set for every analyst/reviewer
/// stage prompt (§4.4). Installed once at adapter construction; operators
/// extend it with additional languages via [`PromptLibrary::register`].
pub fn default_english_templates() -> PromptLibrary {
    let mut lib = PromptLibrary::new("en");

    lib.register(
        "analyst.title",
        "en",
        "You are a document analyst. Propose a concise, human-readable title for the document below.\n\
         Respond with a JSON object: {\"suggested_value\": string, \"reasoning\": string, \"confidence\": number, \"alternatives\": [string]}.",
        "# Document content\n{document_content}\n\n# Existing title (if any)\n{existing_value}",
    );
    lib.register(
        "reviewer.title",
        "en",
        "You are a meticulous reviewer. Decide whether the proposed title is accurate and well-formed.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed title\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}",
    );
    lib.register(
        "analyst.correspondent",
        "en",
        "You are a document analyst. Identify the sender or recipient (\"correspondent\") of this document.\n\
         Prefer one of the existing correspondents when it plausibly matches.\n\
         Respond with a JSON object: {\"suggested_value\": string, \"reasoning\": string, \"confidence\": number, \"alternatives\": [string]}.",
        "# Document content\n{document_content}\n\n# Existing correspondents\n{existing_entities}",
    );
    lib.register(
        "reviewer.correspondent",
        "en",
        "You are a meticulous reviewer. Decide whether the proposed correspondent is correct.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed correspondent\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}\n\n# Prior feedback\n{feedback}",
    );
    lib.register(
        "analyst.document_type",
        "en",
        "You are a document analyst. Classify this document's type. Prefer one of the existing types when it plausibly matches.\n\
         Respond with a JSON object: {\"suggested_value\": string, \"reasoning\": string, \"confidence\": number, \"alternatives\": [string]}.",
        "# Document content\n{document_content}\n\n# Existing document types\n{existing_entities}",
    );
    lib.register(
        "reviewer.document_type",
        "en",
        "You are a meticulous reviewer. Decide whether the proposed document type is correct.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed document type\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}",
    );
    lib.register(
        "analyst.tags",
        "en",
        "You are a document analyst. Suggest zero or more tags describing this document. Prefer existing tags when they plausibly apply.\n\
         Respond with a JSON object: {\"suggested_value\": [string], \"reasoning\": string, \"confidence\": number, \"alternatives\": [[string]]}.",
        "# Document content\n{document_content}\n\n# Existing tags\n{existing_entities}",
    );
    lib.register(
        "reviewer.tags",
        "en",
        "You are a meticulous reviewer. Decide whether the proposed tag set is accurate and not redundant.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed tags\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}",
    );
    lib.register(
        "analyst.custom_fields",
        "en",
        "You are a document analyst. Extract values for the given custom fields if present in the document.\n\
         Respond with a JSON object: {\"suggested_value\": object, \"reasoning\": string, \"confidence\": number, \"alternatives\": [object]}.",
        "# Document content\n{document_content}\n\n# Field schema\n{existing_entities}",
    );
    lib.register(
        "reviewer.custom_fields",
        "en",
        "You are a meticulous reviewer. Decide whether the extracted custom-field values are correct.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed values\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}",
    );
    lib.register(
        "analyst.document_links",
        "en",
        "You are a document analyst. Given similar documents retrieved from a vector search, decide which (if any) this document should be linked to.\n\
         Respond with a JSON object: {\"suggested_value\": [integer], \"reasoning\": string, \"confidence\": number, \"alternatives\": [[integer]]}.",
        "# Document content\n{document_content}\n\n# Candidate similar documents\n{existing_entities}",
    );
    lib.register(
        "reviewer.document_links",
        "en",
        "You are a meticulous reviewer. Decide whether the proposed document links are genuinely related documents.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed links\n{suggested_value}\n\n# Analyst reasoning\n{reasoning}",
    );
    lib.register(
        "analyst.summary",
        "en",
        "You are a document analyst. Write a short summary of this document.\n\
         Respond with a JSON object: {\"suggested_value\": string, \"reasoning\": string, \"confidence\": number, \"alternatives\": [string]}.",
        "# Document content\n{document_content}",
    );
    lib.register(
        "reviewer.summary",
        "en",
        "You are a meticulous reviewer. Decide whether the summary is accurate and faithful to the source.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed summary\n{suggested_value}",
    );
    lib.register(
        "analyst.schema_analysis",
        "en",
        "You are a document analyst. Propose any new correspondent, document type or tag names that this document suggests are missing from the namespace.\n\
         Respond with a JSON object: {\"suggested_value\": [object], \"reasoning\": string, \"confidence\": number, \"alternatives\": [[object]]}.",
        "# Document content\n{document_content}\n\n# Existing entities\n{existing_entities}",
    );
    lib.register(
        "reviewer.schema_analysis",
        "en",
        "You are a meticulous reviewer. Decide whether each proposed new entity is genuinely novel and not a near-duplicate of an existing one.\n\
         Respond with a JSON object: {\"confirmed\": bool, \"feedback\": string|null}.",
        "# Document content\n{document_content}\n\n# Proposed entities\n{suggested_value}\n\n# Existing entities\n{existing_entities}",
    );

    lib
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables() {
        let mut lib = PromptLibrary::new("en");
        lib.register("greet", "en", "system text", "Hello {name}, today is {day}.");
        let mut vars = HashMap::new();
        vars.insert("name", "Ada".to_string());
        vars.insert("day", "Tuesday".to_string());
        let rendered = lib.render("greet", "en", &vars).unwrap();
        assert_eq!(rendered.user, "Hello Ada, today is Tuesday.");
    }

    #[test]
    fn falls_back_to_reference_language_when_translation_missing() {
        let mut lib = PromptLibrary::new("en");
        lib.register("greet", "en", "sys", "Hello {name}");
        let vars = HashMap::from([("name", "Ada".to_string())]);
        let rendered = lib.render("greet", "fr", &vars).unwrap();
        assert_eq!(rendered.user, "Hello Ada");
    }

    #[test]
    fn default_templates_cover_every_stage() {
        let lib = default_english_templates();
        for name in [
            "title",
            "correspondent",
            "document_type",
            "tags",
            "custom_fields",
            "document_links",
            "summary",
            "schema_analysis",
        ] {
            let vars = HashMap::new();
            assert!(lib.render(&format!("analyst.{name}"), "en", &vars).is_some());
            assert!(lib.render(&format!("reviewer.{name}"), "en", &vars).is_some());
        }
    }
}
