//! Advice and forecast text from the language model.
//!
//! Both modes send the same spending summary ("category: total" lines plus
//! the grand total) under a mode-specific system instruction and return the
//! model's answer verbatim.

use crate::error::{AppError, Result};
use crate::llm::Completion;
use crate::reports::{render_lines, Aggregate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Advice,
    Forecast,
}

impl Mode {
    fn system(self) -> &'static str {
        match self {
            Mode::Advice => {
                "Ты финансовый консультант. По сводке расходов дай короткий \
                 практичный совет, как сэкономить. Не больше пяти пунктов."
            }
            Mode::Forecast => {
                "Ты финансовый аналитик. По сводке расходов спрогнозируй траты \
                 на следующий месяц: назови ожидаемую сумму и кратко объясни, \
                 какие категории её определяют."
            }
        }
    }

    fn ask(self) -> &'static str {
        match self {
            Mode::Advice => "Дай совет по экономии.",
            Mode::Forecast => "Сделай прогноз расходов на следующий месяц.",
        }
    }
}

/// The user instruction sent to the model.
pub fn build_prompt(agg: &Aggregate, mode: Mode, currency: &str) -> String {
    format!(
        "Мои расходы по категориям:\n{}\n\n{}",
        render_lines(agg, currency, false),
        mode.ask()
    )
}

pub async fn generate(
    agg: &Aggregate,
    mode: Mode,
    currency: &str,
    llm: &dyn Completion,
) -> Result<String> {
    let prompt = build_prompt(agg, mode, currency);
    let text = llm
        .complete(mode.system(), &prompt)
        .await
        .map_err(|e| AppError::AdvisoryFailure(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(AppError::AdvisoryFailure("empty response".into()));
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::FakeCompletion;
    use crate::models::Entry;
    use crate::reports::aggregate;

    fn sample() -> Aggregate {
        aggregate(&[Entry::new("Food", 3000), Entry::new("Transport", 1500)]).unwrap()
    }

    #[test]
    fn test_prompt_lists_totals() {
        let prompt = build_prompt(&sample(), Mode::Advice, "₸");
        assert!(prompt.contains("Food: 3000₸\nTransport: 1500₸\nИтого: 4500₸"));
        assert!(prompt.ends_with("Дай совет по экономии."));
    }

    #[tokio::test]
    async fn test_modes_use_different_personas() {
        let llm = FakeCompletion::replying("  Готовьте дома.  ");
        let advice = generate(&sample(), Mode::Advice, "₸", &llm).await.unwrap();
        assert_eq!(advice, "Готовьте дома.");
        generate(&sample(), Mode::Forecast, "₸", &llm).await.unwrap();

        let calls = llm.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].0.contains("консультант"));
        assert!(calls[1].0.contains("аналитик"));
        assert!(calls[1].1.contains("прогноз"));
    }

    #[tokio::test]
    async fn test_provider_error_is_advisory_failure() {
        let llm = FakeCompletion::failing();
        let err = generate(&sample(), Mode::Forecast, "₸", &llm).await.unwrap_err();
        assert!(matches!(err, AppError::AdvisoryFailure(_)));
    }

    #[tokio::test]
    async fn test_empty_answer_is_advisory_failure() {
        let llm = FakeCompletion::replying("   ");
        let err = generate(&sample(), Mode::Advice, "₸", &llm).await.unwrap_err();
        assert!(matches!(err, AppError::AdvisoryFailure(_)));
    }
}
