use crate::types::{Chapter, Language, ScriptMeta};

const SEPARATOR: &str = "----------------------------------------";

struct HeaderLabels {
    title: &'static str,
    genre: &'static str,
    style: &'static str,
    total_chapters: &'static str,
    outline: &'static str,
}

fn labels(language: Language) -> HeaderLabels {
    match language {
        Language::Vi => HeaderLabels {
            title: "Tên Kịch bản",
            genre: "Thể loại",
            style: "Phong cách Viết",
            total_chapters: "Tổng số phần",
            outline: "DÀN Ý",
        },
        Language::En => HeaderLabels {
            title: "Script Title",
            genre: "Genre",
            style: "Writing Style",
            total_chapters: "Total Chapters",
            outline: "OUTLINE",
        },
    }
}

/// Plain-text manuscript: metadata header, optional outline, then every chapter
pub fn render_text(meta: &ScriptMeta, chapters: &[Chapter]) -> String {
    let labels = labels(meta.language);
    let mut out = format!(
        "{}: {}\n{}: {}\n{}: {}\n{}: {}\n\n",
        labels.title,
        meta.title,
        labels.genre,
        meta.genre,
        labels.style,
        meta.style,
        labels.total_chapters,
        meta.total_chapters
    );

    if let Some(outline) = meta.outline.as_deref().filter(|o| !o.is_empty()) {
        out.push_str(&format!(
            "{}:\n{SEPARATOR}\n{outline}\n{SEPARATOR}\n\n",
            labels.outline
        ));
    }

    let body = chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            format!(
                "## {} {}: {}\n\n{}\n\n",
                meta.language.chapter_word(),
                index + 1,
                chapter.title,
                chapter.content
            )
        })
        .collect::<Vec<_>>()
        .join(&format!("{SEPARATOR}\n\n"));
    out.push_str(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(language: Language, outline: Option<&str>) -> ScriptMeta {
        ScriptMeta {
            title: "Night Road".to_string(),
            genre: "Horror".to_string(),
            style: "Cinematic".to_string(),
            total_chapters: "2".to_string(),
            language,
            outline: outline.map(str::to_string),
        }
    }

    #[test]
    fn renders_english_header_and_chapters() {
        let chapters = vec![Chapter::new("Start", "Body one."), Chapter::new("End", "Body two.")];
        let text = render_text(&meta(Language::En, None), &chapters);
        assert_eq!(
            text,
            "Script Title: Night Road\nGenre: Horror\nWriting Style: Cinematic\nTotal Chapters: 2\n\n\
             ## Chapter 1: Start\n\nBody one.\n\n\
             ----------------------------------------\n\n\
             ## Chapter 2: End\n\nBody two.\n\n"
        );
    }

    #[test]
    fn default_language_writes_vietnamese_header() {
        let meta = ScriptMeta {
            title: "Đêm".to_string(),
            total_chapters: "1".to_string(),
            ..ScriptMeta::default()
        };
        let text = render_text(&meta, &[Chapter::new("Mở đầu", "Trời tối.")]);
        assert_eq!(
            text,
            "Tên Kịch bản: Đêm\nThể loại: \nPhong cách Viết: \nTổng số phần: 1\n\n\
             ## Chương 1: Mở đầu\n\nTrời tối.\n\n"
        );
    }

    #[test]
    fn includes_outline_block_in_vietnamese() {
        let text = render_text(&meta(Language::Vi, Some("1. Mở đầu")), &[]);
        assert!(text.starts_with("Tên Kịch bản: Night Road\n"));
        assert!(text.contains("DÀN Ý:\n----------------------------------------\n1. Mở đầu\n"));
    }
}
