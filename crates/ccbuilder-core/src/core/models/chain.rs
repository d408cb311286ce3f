use super::ids::ResidueId;

/// A single helix of the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                        // Chain label (e.g., 'A', 'B')
    pub(crate) residues: Vec<ResidueId>, // Residues in N- to C-terminal order
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

const CHAIN_LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest bundle whose chains all get distinct labels.
pub const MAX_CHAINS: usize = CHAIN_LABELS.len();

/// Returns the label of the chain at `index` in a bundle: 'A', 'B', ... 'Z',
/// then 'a' ... 'z', then '0' ... '9'.
pub fn chain_label(index: usize) -> char {
    CHAIN_LABELS[index % MAX_CHAINS] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chain_is_empty() {
        let chain = Chain::new('B');
        assert_eq!(chain.id, 'B');
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn chain_labels_follow_alphabetical_order() {
        assert_eq!(chain_label(0), 'A');
        assert_eq!(chain_label(3), 'D');
        assert_eq!(chain_label(25), 'Z');
        assert_eq!(chain_label(26), 'a');
        assert_eq!(chain_label(52), '0');
        assert_eq!(chain_label(MAX_CHAINS - 1), '9');
    }
}
