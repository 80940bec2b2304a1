pub trait Also: Sized {
    /// Runs `f` on a reference to the value, then hands the value back.
    fn also<F: FnOnce(&Self)>(self, f: F) -> Self {
        f(&self);
        self
    }
}

impl<T> Also for T {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_also() {
        let mut seen = None;
        let value = 5.also(|value| seen = Some(*value));
        assert_eq!(value, 5);
        assert_eq!(seen, Some(5));
    }
}
