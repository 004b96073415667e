// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::forms::ArticleForm;
use crate::model::{KnowledgeArticle, KnowledgeCategory, UNASSIGNED_OWNER};

pub const DEFAULT_ARTICLE_SUMMARY: &str = "Summary forthcoming.";
pub const NO_MATCHING_ARTICLES: &str = "No articles match your search.";
pub const NO_ARTICLE_SELECTED: &str = "Select an article to view the knowledge summary";

/// Category with the articles that survived the current search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatches<'a> {
    pub category: &'a KnowledgeCategory,
    pub articles: Vec<&'a KnowledgeArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCreated {
    pub category_id: String,
    pub article_id: String,
}

/// Two-level category/article browser with article search and a create
/// dialog. Selection falls back at read time, so a stale id never dangles.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    categories: Vec<KnowledgeCategory>,
    selected_category: Option<String>,
    selected_article: Option<String>,
    search_term: String,
    draft: Option<ArticleForm>,
}

impl KnowledgeBase {
    pub fn new(categories: Vec<KnowledgeCategory>) -> Self {
        let selected_category = categories.first().map(|category| category.id.clone());
        let selected_article = categories
            .first()
            .and_then(|category| category.articles.first())
            .map(|article| article.id.clone());
        Self {
            categories,
            selected_category,
            selected_article,
            search_term: String::new(),
            draft: None,
        }
    }

    pub fn categories(&self) -> &[KnowledgeCategory] {
        &self.categories
    }

    pub fn article_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.articles.len())
            .sum()
    }

    /// The selected category, or the first one when the selection is gone.
    pub fn selected_category(&self) -> Option<&KnowledgeCategory> {
        self.selected_category
            .as_deref()
            .and_then(|id| self.categories.iter().find(|category| category.id == id))
            .or_else(|| self.categories.first())
    }

    /// The selected article within the selected category, falling back to
    /// that category's first article.
    pub fn selected_article(&self) -> Option<&KnowledgeArticle> {
        let category = self.selected_category()?;
        self.selected_article
            .as_deref()
            .and_then(|id| category.articles.iter().find(|article| article.id == id))
            .or_else(|| category.articles.first())
    }

    pub fn select_category(&mut self, category_id: &str) {
        self.selected_category = Some(category_id.to_owned());
    }

    pub fn select_article(&mut self, category_id: &str, article_id: &str) {
        self.selected_category = Some(category_id.to_owned());
        self.selected_article = Some(article_id.to_owned());
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search_term.push(ch);
    }

    pub fn pop_search_char(&mut self) {
        self.search_term.pop();
    }

    /// Categories with at least one article matching the search term in its
    /// title, owner, summary or highlights. A blank term matches everything.
    pub fn filtered(&self) -> Vec<CategoryMatches<'_>> {
        let term = self.search_term.trim().to_lowercase();
        self.categories
            .iter()
            .filter_map(|category| {
                let articles = category
                    .articles
                    .iter()
                    .filter(|article| term.is_empty() || article_haystack(article).contains(&term))
                    .collect::<Vec<_>>();
                if term.is_empty() || !articles.is_empty() {
                    Some(CategoryMatches { category, articles })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Moves the selection through the visible articles in display order.
    pub fn move_selection(&mut self, delta: isize) {
        let visible = self
            .filtered()
            .into_iter()
            .flat_map(|matches| {
                let category_id = matches.category.id.clone();
                matches
                    .articles
                    .into_iter()
                    .map(move |article| (category_id.clone(), article.id.clone()))
            })
            .collect::<Vec<_>>();
        if visible.is_empty() {
            return;
        }
        let current = self.selected_category().zip(self.selected_article());
        let position = current
            .and_then(|(category, article)| {
                visible
                    .iter()
                    .position(|(c, a)| *c == category.id && *a == article.id)
            })
            .map_or(-1, |index| index as isize);
        let next = (position + delta).clamp(0, visible.len() as isize - 1) as usize;
        let (category_id, article_id) = visible[next].clone();
        self.select_article(&category_id, &article_id);
    }

    // -- create dialog --

    /// Opens the create dialog; refused when there is nowhere to file it.
    pub fn open_create(&mut self) -> bool {
        if self.categories.is_empty() {
            return false;
        }
        self.draft = Some(ArticleForm::for_categories(&self.categories));
        true
    }

    pub fn draft(&self) -> Option<&ArticleForm> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ArticleForm> {
        self.draft.as_mut()
    }

    pub fn cancel_create(&mut self) {
        self.draft = None;
    }

    /// Files the draft as a new article at the top of its category and
    /// selects it. A blank title (or a vanished category) just closes the
    /// dialog.
    pub fn create_article(&mut self, now: OffsetDateTime) -> Option<ArticleCreated> {
        let draft = self.draft.take()?;
        let title = draft.title.trim();
        if title.is_empty() {
            return None;
        }
        let highlights = draft.highlight_lines();
        let category_id = draft.category_id.clone();
        let article_id = self.unique_article_id(&category_id, now);
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)?;

        let owner = draft.owner.trim();
        let summary = draft.summary.trim();
        let article = KnowledgeArticle {
            id: article_id.clone(),
            title: title.to_owned(),
            owner: if owner.is_empty() {
                UNASSIGNED_OWNER.to_owned()
            } else {
                owner.to_owned()
            },
            status: draft.status,
            updated: now.date().to_string(),
            summary: if summary.is_empty() {
                DEFAULT_ARTICLE_SUMMARY.to_owned()
            } else {
                summary.to_owned()
            },
            highlights,
        };
        category.articles.insert(0, article);
        self.select_article(&category_id, &article_id);
        Some(ArticleCreated {
            category_id,
            article_id,
        })
    }

    /// Drops an article the owner refused to store.
    pub fn remove_article(
        &mut self,
        category_id: &str,
        article_id: &str,
    ) -> Option<KnowledgeArticle> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)?;
        let index = category
            .articles
            .iter()
            .position(|article| article.id == article_id)?;
        Some(category.articles.remove(index))
    }

    fn unique_article_id(&self, category_id: &str, now: OffsetDateTime) -> String {
        let mut millis = now.unix_timestamp_nanos() / 1_000_000;
        loop {
            let candidate = format!("{category_id}-{millis}");
            let taken = self
                .categories
                .iter()
                .flat_map(|category| category.articles.iter())
                .any(|article| article.id == candidate);
            if !taken {
                return candidate;
            }
            millis += 1;
        }
    }
}

fn article_haystack(article: &KnowledgeArticle) -> String {
    let mut parts = vec![
        article.title.as_str(),
        article.owner.as_str(),
        article.summary.as_str(),
    ];
    parts.extend(article.highlights.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}
