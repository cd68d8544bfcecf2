//! Builds parameterized list, search and by-key SELECTs from a joined view.

/// Escape character used in every LIKE pattern built here.
const LIKE_ESCAPE: char = '\\';

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: String) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// One resource's joined read: the SELECT with its joins, the ordering key, and the text columns search matches on.
pub struct JoinedSelect {
    pub select: &'static str,
    pub key: &'static str,
    pub search_columns: &'static [&'static str],
}

impl JoinedSelect {
    /// All rows ordered by key.
    pub fn list(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        q.sql = format!("{} ORDER BY {}", self.select, self.key);
        q
    }

    /// Case-insensitive substring match on any search column (one shared parameter), ordered by key.
    /// A view without search columns lists everything.
    pub fn search(&self, term: &str) -> QueryBuf {
        if self.search_columns.is_empty() {
            return self.list();
        }
        let mut q = QueryBuf::new();
        let n = q.push_param(like_pattern(term));
        let ors: Vec<String> = self
            .search_columns
            .iter()
            .map(|c| format!("{} ILIKE ${} ESCAPE '{}'", c, n, LIKE_ESCAPE))
            .collect();
        q.sql = format!(
            "{} WHERE {} ORDER BY {}",
            self.select,
            ors.join(" OR "),
            self.key
        );
        q
    }

    /// Single row by key. Caller binds the key as the sole param.
    pub fn by_key(&self) -> String {
        format!("{} WHERE {} = $1", self.select, self.key)
    }
}

/// `%term%` with LIKE wildcards in `term` matched literally.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: JoinedSelect = JoinedSelect {
        select: "SELECT t.id, t.name FROM things t",
        key: "t.id",
        search_columns: &["t.name", "t.code"],
    };

    #[test]
    fn list_orders_by_key() {
        let q = VIEW.list();
        assert_eq!(q.sql, "SELECT t.id, t.name FROM things t ORDER BY t.id");
        assert!(q.params.is_empty());
    }

    #[test]
    fn search_ors_every_column_with_one_param() {
        let q = VIEW.search("ab");
        assert_eq!(
            q.sql,
            "SELECT t.id, t.name FROM things t WHERE t.name ILIKE $1 ESCAPE '\\' OR t.code ILIKE $1 ESCAPE '\\' ORDER BY t.id"
        );
        assert_eq!(q.params, vec!["%ab%".to_string()]);
    }

    #[test]
    fn search_without_columns_is_a_plain_list() {
        let view = JoinedSelect {
            search_columns: &[],
            ..VIEW
        };
        assert_eq!(view.search("ab").sql, view.list().sql);
        assert!(view.search("ab").params.is_empty());
    }

    #[test]
    fn by_key_binds_first_param() {
        assert_eq!(VIEW.by_key(), "SELECT t.id, t.name FROM things t WHERE t.id = $1");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
