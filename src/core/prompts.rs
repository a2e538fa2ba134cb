//! Instruction templates sent to the model, one per category.
//!
//! Every template asks for a JSON object with exactly three keys:
//! `title` (max 80 chars), `description` (140-180 chars) and `body`
//! (simple HTML).

use crate::domain::Category;

/// System message sent alongside every template
pub const SYSTEM_PROMPT: &str =
    "Sei un redattore di un magazine automobilistico italiano. \
     Rispondi sempre e solo con un singolo oggetto JSON valido.";

/// Build the user prompt for a category and brief
pub fn build_prompt(category: Category, brief: &str) -> String {
    let brief = brief.trim();
    match category {
        Category::News => news_prompt(brief),
        Category::Tests => tests_prompt(brief),
        Category::Guides => guides_prompt(brief),
    }
}

fn news_prompt(brief: &str) -> String {
    format!(
        r#"Sei un redattore auto. Scrivi una breve NEWS in italiano sul tema: "{brief}".
Requisiti:
- Titolo accattivante (massimo 80 caratteri).
- Sottotitolo/descrizione (una frase, 140-180 caratteri).
- Corpo: 4-6 paragrafi brevi con dati concreti e tono giornalistico.
- Evita affermazioni non verificabili.
RESTITUISCI in JSON: {{ "title": "...", "description": "...", "body": "<html semplice con <p>, <h2>, <ul> se serve>" }}"#
    )
}

fn tests_prompt(brief: &str) -> String {
    format!(
        r#"Sei un tester auto. Scrivi una PROVA su strada in italiano sul tema: "{brief}".
Requisiti:
- Titolo forte (massimo 80 caratteri).
- Descrizione sintetica (140-180 caratteri).
- Struttura corpo in HTML semplice con sezioni:
  <h2>Come va</h2> <p>...</p>
  <h2>Consumi</h2> <p>...</p>
  <h2>Tecnologia e ADAS</h2> <p>...</p>
  <h2>Pro e Contro</h2> <ul><li>Pro: ...</li><li>Contro: ...</li></ul>
  <h2>Pagella</h2> <ul><li>Comfort: 8/10</li>...</ul>
- Tono chiaro, dati verosimili (indicativi), niente esagerazioni.
RESTITUISCI in JSON: {{ "title": "...", "description": "...", "body": "<html...>" }}"#
    )
}

fn guides_prompt(brief: &str) -> String {
    format!(
        r#"Sei un autore di guide auto. Scrivi una GUIDA in italiano sul tema: "{brief}".
Requisiti:
- Titolo chiaro (massimo 80 caratteri).
- Descrizione (140-180 caratteri).
- Corpo in HTML con sezioni:
  <h2>Perché è importante</h2>
  <h2>I punti chiave</h2> (lista)
  <h2>Costi e incentivi</h2>
  <h2>Checklist finale</h2>
RESTITUISCI in JSON: {{ "title": "...", "description": "...", "body": "<html...>" }}"#
    )
}
