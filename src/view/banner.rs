use crate::i18n::Translate;

/// The dismissible "N new posts" notice above the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub count: usize,
    pub before: String,
    pub after: String,
}

impl Banner {
    pub fn text(&self) -> String {
        format!("{} {} {}", self.before, self.count, self.after)
    }

    /// Re-translate the surrounding words, keeping the count.
    pub fn relabel(&mut self, i18n: &dyn Translate) {
        self.before = i18n.translate("banner.before");
        self.after = i18n.translate("banner.after");
    }
}

pub fn build(count: usize, i18n: &dyn Translate) -> Banner {
    let mut banner = Banner {
        count,
        before: String::new(),
        after: String::new(),
    };
    banner.relabel(i18n);
    banner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;

    #[test]
    fn text_embeds_count() {
        let banner = build(2, &Catalog::new("en"));
        assert!(banner.text().contains("2 new posts"));
    }

    #[test]
    fn relabel_keeps_count() {
        let mut banner = build(5, &Catalog::new("en"));
        banner.relabel(&Catalog::new("ru"));
        assert_eq!(banner.count, 5);
        assert!(banner.text().contains("новых постов"));
    }
}
