pub(crate) trait OptionExtension<T> {
    /// Acts similarly to [`Option::expect`], but for lookups that the collection's own structure
    /// guarantees to succeed, such as following a link between two live nodes. The None branch is
    /// therefore [`unreachable!`] rather than a user-facing panic, and no panics annotations are
    /// used for callers.
    fn invariant(self, broken: &'static str) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    #[track_caller]
    fn invariant(self, broken: &'static str) -> T {
        match self {
            Some(val) => val,
            None => unreachable!("{}", broken),
        }
    }
}
