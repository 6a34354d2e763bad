//! User-facing strings.
//!
//! Builders never hard-code text; they ask a [`Translate`] implementation for
//! a key.  [`Catalog`] is the built-in one with English and Russian tables.

/// Localization collaborator.
pub trait Translate {
    /// Look up `key` in the current language.  Unknown keys come back as-is.
    fn translate(&self, key: &str) -> String;

    fn current_language(&self) -> &str;

    /// Switch language.  Returns `false` (and keeps the current one) for an
    /// unsupported tag.
    fn set_language(&mut self, tag: &str) -> bool;
}

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "ru"];

/// The tag that follows `tag` in [`SUPPORTED_LANGUAGES`], wrapping around.
pub fn next_language(tag: &str) -> &'static str {
    let index = SUPPORTED_LANGUAGES
        .iter()
        .position(|l| *l == tag)
        .map_or(0, |i| (i + 1) % SUPPORTED_LANGUAGES.len());
    SUPPORTED_LANGUAGES[index]
}

pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&tag)
}

#[derive(Debug, Clone)]
pub struct Catalog {
    language: &'static str,
}

impl Catalog {
    pub fn new(tag: &str) -> Self {
        let language = SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .find(|l| *l == tag)
            .unwrap_or("en");
        Self { language }
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        let text = match self.language {
            "ru" => ru(key),
            _ => en(key),
        };
        text.map_or_else(|| key.to_string(), String::from)
    }

    fn current_language(&self) -> &str {
        self.language
    }

    fn set_language(&mut self, tag: &str) -> bool {
        match SUPPORTED_LANGUAGES.iter().copied().find(|l| *l == tag) {
            Some(language) => {
                self.language = language;
                true
            }
            None => false,
        }
    }
}

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.title" => "Feeds",
        "form.title" => "Add feed",
        "form.placeholder" => "https://example.com/rss",
        "form.submit" => "Add",
        "form.loading" => "Loading",
        "form.success" => "Feed added",
        "form.error.url" => "Must be a valid URL",
        "form.error.duplicate" => "This feed is already added",
        "form.error.network" => "Network error, try again",
        "form.error.parse" => "This resource does not contain a valid feed",
        "start.prompt" => "Which sources would you like to follow?",
        "sources.title" => "Sources",
        "sources.delete" => "[x] delete",
        "posts.title" => "Posts",
        "post.new" => "new",
        "post.view" => "View",
        "post.markAsRead" => "Mark as read",
        "banner.before" => "Show",
        "banner.after" => "new posts",
        "detail.open" => "Enter/o: open in browser",
        "detail.close" => "Esc: close",
        "status.help" => "Tab: focus  Enter: open  m: mark read  n: show new  d: delete  l: language  q: quit",
        _ => return None,
    })
}

fn ru(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.title" => "Ленты",
        "form.title" => "Добавить ленту",
        "form.placeholder" => "https://example.com/rss",
        "form.submit" => "Добавить",
        "form.loading" => "Загрузка",
        "form.success" => "Лента добавлена",
        "form.error.url" => "Ссылка должна быть валидным URL",
        "form.error.duplicate" => "Эта лента уже добавлена",
        "form.error.network" => "Ошибка сети, попробуйте снова",
        "form.error.parse" => "Ресурс не содержит валидной ленты",
        "start.prompt" => "На какие источники вы хотите подписаться?",
        "sources.title" => "Источники",
        "sources.delete" => "[x] удалить",
        "posts.title" => "Посты",
        "post.new" => "новое",
        "post.view" => "Просмотр",
        "post.markAsRead" => "Прочитано",
        "banner.before" => "Показать",
        "banner.after" => "новых постов",
        "detail.open" => "Enter/o: открыть в браузере",
        "detail.close" => "Esc: закрыть",
        "status.help" => "Tab: фокус  Enter: открыть  m: прочитано  n: новые  d: удалить  l: язык  q: выход",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_in_current_language() {
        let mut catalog = Catalog::new("en");
        assert_eq!(catalog.translate("post.view"), "View");
        assert!(catalog.set_language("ru"));
        assert_eq!(catalog.translate("post.view"), "Просмотр");
        assert_eq!(catalog.current_language(), "ru");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let catalog = Catalog::new("en");
        assert_eq!(catalog.translate("no.such.key"), "no.such.key");
    }

    #[test]
    fn unsupported_language_is_refused() {
        let mut catalog = Catalog::new("en");
        assert!(!catalog.set_language("xx"));
        assert_eq!(catalog.current_language(), "en");
        assert_eq!(Catalog::new("xx").current_language(), "en");
    }

    #[test]
    fn next_language_wraps() {
        assert_eq!(next_language("en"), "ru");
        assert_eq!(next_language("ru"), "en");
        assert_eq!(next_language("xx"), "en");
    }
}
