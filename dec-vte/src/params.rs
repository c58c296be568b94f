//! Parameter accumulation for CSI and DCS sequences.

/// One parameter slot.
///
/// `CSI 3 ; 4 m` produces two scalar slots. A colon subdivides a slot into a
/// sub-parameter list (ECMA-48 5.4.2), so `CSI 38:2:255:0:0 m` produces a
/// single `Sub` slot holding five values. Nesting stops at one level: the
/// elements of a sub-list are always scalars. An unset value stands for the
/// sequence-defined default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Scalar(Option<u32>),
    Sub(Vec<Option<u32>>),
}

/// Growable parameter list. Holds at least one (possibly unset) slot at all
/// times between resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    items: Vec<Param>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            items: vec![Param::Scalar(None)],
        }
    }
}

impl Params {
    /// Scalar value at `index`, unwrapping a sub-parameter list to its first
    /// element; `default` when the slot is absent or unset.
    pub fn get(&self, index: usize, default: u32) -> u32 {
        let value = match self.items.get(index) {
            Some(Param::Scalar(value)) => *value,
            Some(Param::Sub(sub)) => sub.first().copied().flatten(),
            None => None,
        };
        value.unwrap_or(default)
    }

    /// True when no parameter bytes were seen: either no slots at all or a
    /// single slot that is still unset.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() || self.items == [Param::Scalar(None)]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[Param] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.items.iter()
    }

    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.items.push(Param::Scalar(None));
    }

    /// `;` opens a new top-level slot.
    pub(crate) fn separator(&mut self) {
        self.items.push(Param::Scalar(None));
    }

    /// `:` turns the last slot into a sub-parameter list, or grows an
    /// existing one by an unset slot.
    pub(crate) fn subseparator(&mut self) {
        match self.items.last_mut() {
            Some(Param::Sub(sub)) => sub.push(None),
            Some(slot) => {
                let Param::Scalar(value) = *slot else {
                    unreachable!()
                };
                *slot = Param::Sub(vec![value, None]);
            }
            None => panic!("parameter list must never be empty"),
        }
    }

    /// Decimal digit accumulated into the innermost open slot.
    pub(crate) fn digit(&mut self, digit: u32) {
        let slot = match self.items.last_mut() {
            Some(Param::Sub(sub)) => match sub.last_mut() {
                Some(slot) => slot,
                None => panic!("sub-parameter list must never be empty"),
            },
            Some(Param::Scalar(slot)) => slot,
            None => panic!("parameter list must never be empty"),
        };
        *slot = Some(slot.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_one_unset_slot() {
        let params = Params::default();
        assert!(params.is_empty());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(0, 7), 7);
    }

    #[test]
    fn accumulates_decimal_digits() {
        let mut params = Params::default();
        params.digit(3);
        params.digit(1);
        assert_eq!(params.get(0, 0), 31);
        assert!(!params.is_empty());
    }

    #[test]
    fn separator_opens_a_new_slot() {
        let mut params = Params::default();
        params.digit(1);
        params.separator();
        assert_eq!(params.len(), 2);
        // The new slot is unset until a digit arrives.
        assert_eq!(params.get(1, 9), 9);
        params.digit(5);
        assert_eq!(params.get(1, 9), 5);
    }

    #[test]
    fn colon_builds_a_sub_list() {
        let mut params = Params::default();
        params.digit(3);
        params.digit(8);
        for digits in [vec![2], vec![2, 5, 5], vec![0], vec![0]] {
            params.subseparator();
            for d in digits {
                params.digit(d);
            }
        }
        assert_eq!(
            params.as_slice(),
            [Param::Sub(vec![
                Some(38),
                Some(2),
                Some(255),
                Some(0),
                Some(0)
            ])]
        );
        // `get` unwraps a sub-list to its first element.
        assert_eq!(params.get(0, 0), 38);
    }

    #[test]
    fn colon_on_an_unset_slot() {
        let mut params = Params::default();
        params.subseparator();
        assert_eq!(params.as_slice(), [Param::Sub(vec![None, None])]);
        assert_eq!(params.get(0, 4), 4);
    }

    #[test]
    fn accumulation_saturates() {
        let mut params = Params::default();
        for _ in 0..12 {
            params.digit(9);
        }
        assert_eq!(params.get(0, 0), u32::MAX);
    }

    #[test]
    fn reset_restores_the_initial_slot() {
        let mut params = Params::default();
        params.digit(2);
        params.separator();
        params.reset();
        assert!(params.is_empty());
        assert_eq!(params.len(), 1);
    }
}
