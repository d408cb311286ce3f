use slotmap::new_key_type;

new_key_type! {
    /// Key of an atom inside a [`MolecularSystem`](super::system::MolecularSystem).
    pub struct AtomId;
    /// Key of a residue inside a [`MolecularSystem`](super::system::MolecularSystem).
    pub struct ResidueId;
    /// Key of a chain inside a [`MolecularSystem`](super::system::MolecularSystem).
    pub struct ChainId;
}
