use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueType};
use slotmap::SlotMap;
use std::collections::HashMap;

/// A complete molecular system: atoms, residues and chains.
///
/// Storage uses slot maps for stable IDs, while chain order is tracked
/// explicitly so that traversal (and therefore scoring and encoding) is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in insertion order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding chains by their single-character label.
    chain_id_map: HashMap<char, ChainId>,
    /// Lookup map for finding residues by chain and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Mutable iteration over every atom, in storage order.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Chains in the order they were added.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    pub fn chain_count(&self) -> usize {
        self.chain_order.len()
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    pub fn find_residue_by_number(&self, chain_id: ChainId, number: isize) -> Option<ResidueId> {
        self.residue_id_map.get(&(chain_id, number)).copied()
    }

    /// Adds a new chain or returns the existing one with the same label.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_order.push(chain_id);
        self.chain_id_map.insert(id, chain_id);
        chain_id
    }

    /// Adds a residue to a chain, or returns the existing residue with the
    /// same number. Returns `None` when the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        residue_type: ResidueType,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            self.residues
                .insert(Residue::new(number, residue_type, chain_id))
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }
        Some(residue_id)
    }

    /// Inserts an atom and registers it with its residue. Returns `None` when
    /// the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);
        Some(atom_id)
    }

    /// Every atom in chain → residue → atom order. This is the canonical order
    /// used for scoring and encoding.
    pub fn ordered_atom_ids(&self) -> Vec<AtomId> {
        let mut ids = Vec::with_capacity(self.atoms.len());
        for (_, chain) in self.chains_iter() {
            for residue_id in chain.residues() {
                if let Some(residue) = self.residues.get(*residue_id) {
                    ids.extend_from_slice(residue.atoms());
                }
            }
        }
        ids
    }

    /// The one-letter sequence of a chain.
    pub fn sequence_of(&self, chain_id: ChainId) -> Option<String> {
        let chain = self.chains.get(chain_id)?;
        Some(
            chain
                .residues()
                .iter()
                .filter_map(|&id| self.residues.get(id))
                .map(|residue| residue.residue_type.to_one_letter())
                .collect(),
        )
    }
}
