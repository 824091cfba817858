//! Interactive main menu (Ukrainian)

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::infrastructure::category_store::{CategoryStore, StoreError};
use crate::infrastructure::config::{validate_markup, AppConfig};

const RULE: &str = "─────────────────────────────────────────";

/// Markup from the prompt answer; blank or unusable input keeps `default`
pub fn parse_markup_input(input: &str, default: f64) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    input
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| validate_markup(*value).is_ok())
}

pub struct Menu<'a, R, W> {
    config: &'a AppConfig,
    store: &'a CategoryStore,
    input: R,
    output: W,
}

impl<'a> Menu<'a, BufReader<Stdin>, std::io::Stdout> {
    pub fn stdio(config: &'a AppConfig, store: &'a CategoryStore) -> Self {
        Self::new(config, store, BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<'a, R, W> Menu<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(config: &'a AppConfig, store: &'a CategoryStore, input: R, output: W) -> Self {
        Self {
            config,
            store,
            input,
            output,
        }
    }

    /// Loop until "5" or end of input
    pub async fn run(mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Ваш вибір: ").await? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.add_category().await?,
                "2" => self.list_categories().await?,
                "3" => self.remove_category().await?,
                "4" => self.start_parsing().await?,
                "5" => {
                    writeln!(self.output, "\n👋 До побачення!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "\n❌ Невірний вибір. Спробуйте ще раз.\n")?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "╔════════════════════════════════════════╗")?;
        writeln!(self.output, "║     ПАРСЕР ШИН - ГОЛОВНЕ МЕНЮ         ║")?;
        writeln!(self.output, "╚════════════════════════════════════════╝")?;
        writeln!(self.output)?;
        writeln!(self.output, "  1 ➜ Додати категорію")?;
        writeln!(self.output, "  2 ➜ Показати всі категорії")?;
        writeln!(self.output, "  3 ➜ Видалити категорію")?;
        writeln!(self.output, "  4 ➜ ЗАПУСТИТИ ПАРСИНГ")?;
        writeln!(self.output, "  5 ➜ Вихід")?;
        writeln!(self.output)?;
        Ok(())
    }

    fn print_header(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "         {title}")?;
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    /// Trimmed answer, `None` at end of input
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn add_category(&mut self) -> Result<()> {
        self.print_header("ДОДАТИ НОВУ КАТЕГОРІЮ")?;
        let url = self.prompt("📎 Введіть URL категорії: ").await?.unwrap_or_default();
        if url.is_empty() {
            writeln!(self.output, "❌ URL не може бути пустим")?;
            return Ok(());
        }
        let name = self.prompt("📝 Введіть назву категорії: ").await?.unwrap_or_default();
        if name.is_empty() {
            writeln!(self.output, "❌ Назва не може бути пустою")?;
            return Ok(());
        }

        match self.store.add(&url, &name).await {
            Ok(category) => writeln!(
                self.output,
                "\n✅ Категорію '{}' успішно додано!\n",
                category.display_name
            )?,
            Err(e) => writeln!(self.output, "❌ Помилка: {e}")?,
        }
        Ok(())
    }

    async fn list_categories(&mut self) -> Result<()> {
        let categories = self.store.load().await;
        self.print_header("СПИСОК КАТЕГОРІЙ")?;

        if categories.is_empty() {
            writeln!(self.output, "📭 Категорій поки немає")?;
            writeln!(self.output, "💡 Додайте першу категорію (пункт 1)\n")?;
            return Ok(());
        }

        for (i, category) in categories.iter().enumerate() {
            writeln!(self.output, "\n{}. 📦 {}", i + 1, category.display_name)?;
            writeln!(self.output, "   🔗 {}", category.url)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    async fn remove_category(&mut self) -> Result<()> {
        let categories = self.store.load().await;
        if categories.is_empty() {
            writeln!(self.output, "\n📭 Немає категорій для видалення\n")?;
            return Ok(());
        }

        self.print_header("ВИДАЛИТИ КАТЕГОРІЮ")?;
        for (i, category) in categories.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, category.display_name)?;
        }

        let answer = self
            .prompt("\n🗑️  Введіть номер для видалення (0 - відміна): ")
            .await?
            .unwrap_or_default();

        match answer.parse::<usize>() {
            Ok(0) => writeln!(self.output, "↩️  Відмінено\n")?,
            Ok(position) => match self.store.remove(position).await {
                Ok(removed) => writeln!(self.output, "\n✅ Категорію '{}' видалено!\n", removed.display_name)?,
                Err(StoreError::InvalidPosition { .. }) => writeln!(self.output, "❌ Невірний номер\n")?,
                Err(e) => writeln!(self.output, "❌ Помилка: {e}")?,
            },
            Err(_) => writeln!(self.output, "❌ Невірний номер\n")?,
        }
        Ok(())
    }

    async fn start_parsing(&mut self) -> Result<()> {
        let categories = self.store.load().await;
        if categories.is_empty() {
            writeln!(self.output, "\n❌ Спочатку додайте категорії (пункт 1)\n")?;
            return Ok(());
        }

        self.print_header("НАЛАШТУВАННЯ ПАРСИНГУ")?;
        writeln!(self.output, "\n📋 Буде оброблено категорій: {}", categories.len())?;

        let default = self.config.crawl.markup_percent;
        let answer = self
            .prompt(&format!("\n💰 Відсоток додавання до ціни (Enter = {default:.0}%): "))
            .await?
            .unwrap_or_default();
        let markup = match parse_markup_input(&answer, default) {
            Some(markup) => markup,
            None => {
                writeln!(self.output, "⚠️  Невірне значення, використовується {default:.0}%")?;
                default
            }
        };

        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "🚀 ПОЧАТОК ПАРСИНГУ...")?;
        writeln!(self.output, "{RULE}\n")?;

        let summary = super::run_crawl(self.config, categories, markup).await?;

        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "✅ ПАРСИНГ ЗАВЕРШЕНО!")?;
        writeln!(self.output, "{RULE}")?;
        for outcome in &summary.categories {
            writeln!(self.output, "📦 {}: {}", outcome.category.display_name, outcome.record_count)?;
        }
        writeln!(self.output)?;
        Ok(())
    }
}
