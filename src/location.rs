use crate::models::ViewState;
use std::collections::BTreeMap;
use url::form_urlencoded;

pub const SEARCH_PARAM: &str = "search";
pub const PAGE_PARAM: &str = "page";

pub type QueryParams = BTreeMap<String, String>;

pub trait ViewLocation {
    fn read(&self) -> QueryParams;

    fn replace(&mut self, params: QueryParams);
}

impl ViewState {
    pub fn from_query(params: &QueryParams) -> Self {
        let search_term = params.get(SEARCH_PARAM).cloned().unwrap_or_default();
        let page = params
            .get(PAGE_PARAM)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self { search_term, page }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if !self.search_term.is_empty() {
            params.insert(SEARCH_PARAM.to_string(), self.search_term.clone());
        }
        if self.page > 0 {
            params.insert(PAGE_PARAM.to_string(), self.page.to_string());
        }
        params
    }
}

pub fn parse_query(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

pub fn encode_query(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    let encoded = serializer.finish();
    if encoded.is_empty() {
        encoded
    } else {
        format!("?{}", encoded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLocation {
    history: Vec<String>,
}

impl QueryLocation {
    pub fn new(query: &str) -> Self {
        Self {
            history: vec![query.to_string()],
        }
    }

    pub fn current(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or_default()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn push(&mut self, query: &str) {
        self.history.push(query.to_string());
    }
}

impl Default for QueryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl ViewLocation for QueryLocation {
    fn read(&self) -> QueryParams {
        parse_query(self.current())
    }

    fn replace(&mut self, params: QueryParams) {
        let encoded = encode_query(&params);
        match self.history.last_mut() {
            Some(current) => *current = encoded,
            None => self.history.push(encoded),
        }
    }
}
