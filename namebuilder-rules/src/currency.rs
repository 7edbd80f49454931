use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::record::Record;

/// Looks up the display symbol of a currency by its reference id.
pub trait CurrencySymbolResolver: Send + Sync {
    fn resolve(&self, currency_id: Uuid) -> Option<String>;
}

impl<F> CurrencySymbolResolver for F
where
    F: Fn(Uuid) -> Option<String> + Send + Sync,
{
    fn resolve(&self, currency_id: Uuid) -> Option<String> {
        self(currency_id)
    }
}

/// Resolver that knows no currencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCurrencySymbols;

impl CurrencySymbolResolver for NoCurrencySymbols {
    fn resolve(&self, _currency_id: Uuid) -> Option<String> {
        None
    }
}

/// Fixed id → symbol table.
#[derive(Debug, Default, Clone)]
pub struct StaticCurrencySymbols {
    symbols: HashMap<Uuid, String>,
}

impl StaticCurrencySymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, currency_id: Uuid, symbol: impl Into<String>) -> Self {
        self.insert(currency_id, symbol);
        self
    }

    pub fn insert(&mut self, currency_id: Uuid, symbol: impl Into<String>) {
        self.symbols.insert(currency_id, symbol.into());
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl CurrencySymbolResolver for StaticCurrencySymbols {
    fn resolve(&self, currency_id: Uuid) -> Option<String> {
        self.symbols.get(&currency_id).cloned()
    }
}

/// Memoizes another resolver. Misses are cached too, so a slow or
/// failing backend is asked at most once per currency.
pub struct CachedCurrencyResolver<R> {
    inner: R,
    cache: Mutex<HashMap<Uuid, Option<String>>>,
}

impl<R: CurrencySymbolResolver> CachedCurrencyResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of currencies looked up so far.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl<R: CurrencySymbolResolver> CurrencySymbolResolver for CachedCurrencyResolver<R> {
    fn resolve(&self, currency_id: Uuid) -> Option<String> {
        let mut cache = self.cache.lock();
        cache
            .entry(currency_id)
            .or_insert_with(|| self.inner.resolve(currency_id))
            .clone()
    }
}

/// Symbol for the record's money fields: the record's own pre-resolved
/// symbol first, then the resolver keyed by the currency reference.
pub fn resolve_currency_symbol(
    record: &Record,
    resolver: &dyn CurrencySymbolResolver,
) -> Option<String> {
    if let Some(symbol) = record.currency_symbol().filter(|s| !s.trim().is_empty()) {
        return Some(symbol.to_string());
    }

    let reference = record.currency_reference()?;
    resolver
        .resolve(reference.id)
        .filter(|symbol| !symbol.trim().is_empty())
}
