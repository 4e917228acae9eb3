//! Expansion of the questionnaire group/question templates.
//!
//! Placeholders are substituted literally; templates are trusted and values
//! are not escaped.

use crate::markup::{append_children, check_radio};
use crate::model::{Question, QuestionGroup, Questionnaire};

pub const GROUP_PLACEHOLDER: &str = "{{group}}";
pub const GROUP_CLASS_PLACEHOLDER: &str = "{{groupClass}}";
pub const QUESTION_PLACEHOLDER: &str = "{{question}}";
pub const QUESTION_INDEX_PLACEHOLDER: &str = "{{questionIndex}}";
pub const QUESTION_ID_PLACEHOLDER: &str = "{{questionID}}";

/// Question indexes are unique across groups: `group * 100 + question`.
const GROUP_INDEX_STRIDE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireTemplates {
    group: String,
    question: String,
}

impl QuestionnaireTemplates {
    #[must_use]
    pub fn new(group: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            group: group.into().trim().to_owned(),
            question: question.into().trim().to_owned(),
        }
    }

    /// Group element with its questions appended as children.
    #[must_use]
    pub fn render_group(&self, group: &QuestionGroup, group_index: usize) -> String {
        let shell = self
            .group
            .replace(GROUP_PLACEHOLDER, &group.display_text)
            .replace(GROUP_CLASS_PLACEHOLDER, &group.group_class);
        let questions: String = group
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                self.render_question(question, group_index * GROUP_INDEX_STRIDE + idx)
            })
            .collect();
        append_children(&shell, &questions)
    }

    #[must_use]
    pub fn render_question(&self, question: &Question, index: usize) -> String {
        let html = self
            .question
            .replace(QUESTION_PLACEHOLDER, &question.question_text)
            .replace(QUESTION_INDEX_PLACEHOLDER, &format!("question{index}"))
            .replace(QUESTION_ID_PLACEHOLDER, &question.question_id.to_string());
        match question.selected_choice() {
            Some(choice) => check_radio(&html, choice),
            None => html,
        }
    }

    #[must_use]
    pub fn render(&self, questionnaire: &Questionnaire) -> String {
        questionnaire
            .question_groups
            .iter()
            .enumerate()
            .map(|(idx, group)| self.render_group(group, idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTION: &str = r#"<div class="q" data-id="{{questionID}}"><p>{{question}}</p><input type="radio" name="{{questionIndex}}" value="1"><input type="radio" name="{{questionIndex}}" value="2"><input type="radio" name="{{questionIndex}}" value="3"><input type="radio" name="{{questionIndex}}" value="4"><input type="radio" name="{{questionIndex}}" value="5"></div>"#;
    const GROUP: &str = r#"<fieldset class="{{groupClass}}"><legend>{{group}}</legend></fieldset>"#;

    fn templates() -> QuestionnaireTemplates {
        QuestionnaireTemplates::new(GROUP, QUESTION)
    }

    fn question(id: i64, value: Option<i64>) -> Question {
        Question {
            question_id: id,
            question_text: format!("Question {id}"),
            value,
        }
    }

    #[test]
    fn value_two_checks_third_choice_only() {
        let html = templates().render_question(&question(7, Some(2)), 0);
        assert_eq!(html.matches(r#"checked="checked""#).count(), 1);
        assert!(html.contains(r#"value="3" checked="checked">"#));
        assert!(html.contains(r#"name="question0""#));
        assert!(html.contains(r#"data-id="7""#));
    }

    #[test]
    fn out_of_range_or_missing_values_check_nothing() {
        assert!(!templates().render_question(&question(1, Some(9)), 0).contains("checked"));
        assert!(!templates().render_question(&question(1, None), 0).contains("checked"));
    }

    #[test]
    fn groups_nest_questions_with_unique_indexes() {
        let data = Questionnaire {
            question_groups: vec![
                QuestionGroup {
                    display_text: "Mood".into(),
                    group_class: "mood".into(),
                    questions: vec![question(1, None), question(2, None)],
                },
                QuestionGroup {
                    display_text: "Sleep".into(),
                    group_class: "sleep".into(),
                    questions: vec![question(3, Some(0))],
                },
            ],
        };
        let html = templates().render(&data);

        assert!(html.starts_with(r#"<fieldset class="mood"><legend>Mood</legend><div class="q""#));
        assert!(html.contains(r#"name="question1""#));
        assert!(html.contains(r#"name="question100""#));
        assert_eq!(html.matches("</fieldset>").count(), 2);
        assert!(html.ends_with("</div></fieldset>"));
        assert_eq!(html.matches("checked=").count(), 1);
    }
}
