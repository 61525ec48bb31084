use crate::types::{Chapter, ScriptMeta};

/// Fountain screenplay: a title page key, then a `.CHAPTER` section per chapter
/// with every non-blank line as its own paragraph
pub fn render_fountain(meta: &ScriptMeta, chapters: &[Chapter]) -> String {
    let mut out = format!("Title: {}\n\n", meta.title);
    for (index, chapter) in chapters.iter().enumerate() {
        out.push_str(&format!(
            "\n.CHAPTER {}: {}\n\n",
            index + 1,
            chapter.title.to_uppercase()
        ));
        for paragraph in chapter.content.split('\n').filter(|p| !p.trim().is_empty()) {
            out.push_str(paragraph);
            out.push_str("\n\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sections_and_paragraphs() {
        let meta = ScriptMeta {
            title: "Night Road".to_string(),
            ..ScriptMeta::default()
        };
        let chapters = vec![Chapter::new("the gate", "KHAI: Open it.\n\n[creak]")];
        assert_eq!(
            render_fountain(&meta, &chapters),
            "Title: Night Road\n\n\n.CHAPTER 1: THE GATE\n\nKHAI: Open it.\n\n[creak]\n\n"
        );
    }
}
