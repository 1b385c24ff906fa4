//! Turns one inbound chat message into one reply.
//!
//! Plain text is treated as an expense ("Такси 1500"); text starting with a
//! slash is a command. Every failure is converted into a user-facing reply
//! here, so callers only ever see `Reply`.

use std::sync::Arc;

use crate::advisor::{self, Mode};
use crate::categorizer::{self, Source};
use crate::chart::{self, Chart};
use crate::error::{AppError, Result};
use crate::fmt::money;
use crate::ledger::Ledger;
use crate::llm::Completion;
use crate::models::Category;
use crate::parser::parse_amount;
use crate::reports::{self, Aggregate, Window};
use crate::settings::ForecastMode;

pub const HELP: &str = "Доступные команды:\n\
📊 /stats – статистика\n\
📅 /week – расходы за неделю\n\
🗓 /month – расходы за месяц\n\
🧹 /reset – сбросить расходы\n\
💡 /advice – совет по экономии\n\
🔮 /forecast – прогноз расходов\n\
❓ /help – помощь";

const GREETING: &str = "👋 Привет! Я бот для учёта финансов.\n\n\
Напиши трату, например: «Такси 1500» или «бургер 3000», и я запишу её в нужную категорию.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Stats,
    Week,
    Month,
    Reset,
    Advice,
    Forecast,
}

impl Command {
    /// `None` for text that is not a slash command; `Some(Err(name))` for an
    /// unknown command. A `@botname` suffix is ignored.
    pub fn parse(text: &str) -> Option<std::result::Result<Command, String>> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();
        let cmd = match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "stats" => Command::Stats,
            "week" => Command::Week,
            "month" => Command::Month,
            "reset" => Command::Reset,
            "advice" => Command::Advice,
            "forecast" => Command::Forecast,
            _ => return Some(Err(name)),
        };
        Some(Ok(cmd))
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub chart: Option<Chart>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chart: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub id: i64,
    pub category: Category,
    pub amount: i64,
    pub source: Source,
}

/// Draws the report chart. Runs on the blocking pool.
pub type ChartRenderer = fn(&Aggregate) -> Result<Option<Chart>>;

#[derive(Clone)]
pub struct Assistant {
    ledger: Arc<dyn Ledger>,
    llm: Arc<dyn Completion>,
    currency: String,
    forecast_mode: ForecastMode,
    render: ChartRenderer,
}

impl Assistant {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        llm: Arc<dyn Completion>,
        currency: String,
        forecast_mode: ForecastMode,
    ) -> Self {
        Self {
            ledger,
            llm,
            currency,
            forecast_mode,
            render: chart::render_pie,
        }
    }

    #[cfg(test)]
    pub fn with_chart_renderer(mut self, render: ChartRenderer) -> Self {
        self.render = render;
        self
    }

    pub async fn handle(&self, text: &str) -> Reply {
        let result = match Command::parse(text) {
            None => self.add_expense(text).await.map(|r| {
                Reply::text(format!(
                    "✅ Записал трату: {} ({})",
                    money(r.amount, &self.currency),
                    r.category
                ))
            }),
            Some(Ok(cmd)) => self.run(cmd).await,
            Some(Err(name)) => Ok(Reply::text(format!(
                "Не знаю команду /{name}.\n\n{HELP}"
            ))),
        };
        result.unwrap_or_else(|e| Reply::text(error_message(&e)))
    }

    pub async fn run(&self, cmd: Command) -> Result<Reply> {
        match cmd {
            Command::Start => Ok(Reply::text(format!("{GREETING}\n\n{HELP}"))),
            Command::Help => Ok(Reply::text(HELP)),
            Command::Stats => self.report(Window::All).await,
            Command::Week => self.report(Window::Week).await,
            Command::Month => self.report(Window::Month).await,
            Command::Reset => self.reset(),
            Command::Advice => self.advice().await,
            Command::Forecast => self.forecast().await,
        }
    }

    /// Parse, classify, then persist. Nothing is written unless both the
    /// amount and the category were decided.
    pub async fn add_expense(&self, text: &str) -> Result<Recorded> {
        let amount = parse_amount(text)?;
        let (category, source) = categorizer::classify(text, self.llm.as_ref()).await?;
        let id = self.ledger.append(category.as_str(), amount)?;
        tracing::info!(id, %category, amount, ?source, "expense recorded");
        Ok(Recorded {
            id,
            category,
            amount,
            source,
        })
    }

    async fn report(&self, window: Window) -> Result<Reply> {
        let entries = reports::load(self.ledger.as_ref(), window)?;
        let Some(agg) = reports::aggregate(&entries) else {
            let empty = match window {
                Window::All => "Пока нет расходов 📭",
                Window::Week | Window::Month => "За этот период расходов нет 📭",
            };
            return Ok(Reply::text(empty));
        };

        let text = reports::render_report(&agg, window, &self.currency);
        let chart = render_chart(agg, self.render).await;
        Ok(Reply { text, chart })
    }

    fn reset(&self) -> Result<Reply> {
        let removed = self.ledger.clear()?;
        tracing::info!(removed, "ledger cleared");
        Ok(Reply::text("🧹 Все расходы сброшены!"))
    }

    async fn advice(&self) -> Result<Reply> {
        let Some(agg) = reports::aggregate(&self.ledger.scan_all()?) else {
            return Ok(Reply::text("Сначала добавь расходы, потом дам совет 💡"));
        };
        let text = advisor::generate(&agg, Mode::Advice, &self.currency, self.llm.as_ref()).await?;
        Ok(Reply::text(format!("💡 Совет: {text}")))
    }

    async fn forecast(&self) -> Result<Reply> {
        let Some(agg) = reports::aggregate(&self.ledger.scan_all()?) else {
            return Ok(Reply::text("Нет данных для прогноза 📭"));
        };
        let text = match self.forecast_mode {
            ForecastMode::Average => format!(
                "🔮 Прогноз: если тратить так же, то за месяц выйдет ~{}",
                money(reports::average_forecast(&agg), &self.currency)
            ),
            ForecastMode::Ai => {
                let text =
                    advisor::generate(&agg, Mode::Forecast, &self.currency, self.llm.as_ref())
                        .await?;
                format!("🔮 Прогноз: {text}")
            }
        };
        Ok(Reply::text(text))
    }
}

/// Chart failures never fail the report; the text goes out alone.
async fn render_chart(agg: Aggregate, render: ChartRenderer) -> Option<Chart> {
    match tokio::task::spawn_blocking(move || render(&agg)).await {
        Ok(Ok(chart)) => chart,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "chart rendering failed");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "chart task failed");
            None
        }
    }
}

pub fn error_message(err: &AppError) -> String {
    match err {
        AppError::ParseFailure => {
            "❌ Не понял сумму. Напиши, например: 'Такси 1500'".to_string()
        }
        AppError::ClassificationFailure(e) => {
            tracing::warn!(error = %e, "classification failed");
            "⚠️ Не удалось определить категорию, трата не записана. Попробуй позже.".to_string()
        }
        AppError::AdvisoryFailure(e) => {
            tracing::warn!(error = %e, "advisory request failed");
            "⚠️ Не удалось получить ответ от ИИ. Попробуй позже.".to_string()
        }
        other => {
            tracing::error!(error = %other, "command failed");
            "⚠️ Что-то пошло не так. Попробуй ещё раз.".to_string()
        }
    }
}
