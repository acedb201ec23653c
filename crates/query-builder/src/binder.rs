//! Placeholder allocation.

use search_types::QueryParam;

/// Collects bound values and hands out `$1..$n` in binding order.
#[derive(Debug, Default)]
pub(crate) struct ParamBinder {
    params: Vec<QueryParam>,
}

impl ParamBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one value, returning its placeholder
    pub fn bind(&mut self, value: impl Into<QueryParam>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    /// Bind each item, returning the comma separated placeholders
    pub fn bind_all<I, T>(&mut self, values: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryParam>,
    {
        values
            .into_iter()
            .map(|value| self.bind(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn into_params(self) -> Vec<QueryParam> {
        self.params
    }
}
