//! Packets whose payload shape is selected by a set of actions.
//!
//! An action-set packet writes a fixed-width bit set of actions, then a list
//! of records. Each record carries one field bundle per action in the set.
//! Bundles are always visited in the action type's *declared* order, which
//! is independent of the bit each action occupies on the wire; that order is
//! what keeps the encoder and the decoder reading the same bytes.
//!
//! # Wire layout
//!
//! ```text
//! bitset(A::WIRE_BITS) | varint record_count | record*
//! record := key | fields(action) for action in declared order if present
//! ```

use std::fmt;
use std::marker::PhantomData;

use buffer::{ByteReader, ByteWriter};

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult, LimitKind};

/// A closed enumeration of actions.
pub trait Action: Copy + Eq + fmt::Debug + 'static {
    /// Every action, in canonical field order.
    const DECLARED: &'static [Self];

    /// Width of the on-wire bit set. At most 64.
    const WIRE_BITS: usize;

    /// Position of this action in the wire bit set.
    fn bit(self) -> u8;

    /// Stable name used in errors and logs.
    fn name(self) -> &'static str;

    /// Finds the action occupying `bit`.
    fn from_bit(bit: u8) -> Option<Self> {
        Self::DECLARED.iter().copied().find(|action| action.bit() == bit)
    }
}

fn declared_index<A: Action>(action: A) -> usize {
    A::DECLARED
        .iter()
        .position(|candidate| *candidate == action)
        .unwrap_or(usize::MAX)
}

/// A set of actions, stored as wire bits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ActionSet<A> {
    bits: u64,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Action> ActionSet<A> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// Returns a set containing every declared action.
    #[must_use]
    pub fn all() -> Self {
        A::DECLARED.iter().copied().collect()
    }

    /// Validates raw wire bits; every set bit must belong to a known action.
    pub fn from_bits(bits: u64) -> CodecResult<Self> {
        let mut rest = bits;
        while rest != 0 {
            let bit = rest.trailing_zeros() as u8;
            if A::from_bit(bit).is_none() {
                return Err(CodecError::UnknownAction { bit });
            }
            rest &= rest - 1;
        }
        Ok(Self {
            bits,
            _marker: PhantomData,
        })
    }

    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub fn insert(&mut self, action: A) {
        self.bits |= 1u64 << action.bit();
    }

    pub fn remove(&mut self, action: A) {
        self.bits &= !(1u64 << action.bit());
    }

    #[must_use]
    pub fn with(mut self, action: A) -> Self {
        self.insert(action);
        self
    }

    #[must_use]
    pub fn contains(&self, action: A) -> bool {
        self.bits & (1u64 << action.bit()) != 0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates members in declared order, never in bit order.
    pub fn iter(&self) -> impl Iterator<Item = A> + '_ {
        A::DECLARED
            .iter()
            .copied()
            .filter(move |action| self.contains(*action))
    }
}

impl<A: Action> Default for ActionSet<A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A: Action> FromIterator<A> for ActionSet<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut set = Self::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl<A: Action> fmt::Debug for ActionSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Action::name))
            .finish()
    }
}

/// One action's field bundle.
pub trait ActionField: Sized {
    type Action: Action;

    /// The action this bundle belongs to.
    fn action(&self) -> Self::Action;

    fn encode_fields(&self, buf: &mut ByteWriter) -> CodecResult<()>;

    /// Reads the bundle for `action`.
    fn decode_fields(action: Self::Action, buf: &mut ByteReader<'_>) -> CodecResult<Self>;
}

/// A tracked object's key plus at most one bundle per action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord<K, F> {
    key: K,
    fields: Vec<F>,
}

impl<K, F: ActionField> ActionRecord<K, F> {
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self {
            key,
            fields: Vec::new(),
        }
    }

    /// Adds `field`, replacing any bundle for the same action.
    #[must_use]
    pub fn with(mut self, field: F) -> Self {
        self.insert(field);
        self
    }

    /// Adds `field`, keeping bundles in declared order.
    pub fn insert(&mut self, field: F) {
        let action = field.action();
        let rank = declared_index(action);
        match self
            .fields
            .binary_search_by_key(&rank, |existing| declared_index(existing.action()))
        {
            Ok(pos) => self.fields[pos] = field,
            Err(pos) => self.fields.insert(pos, field),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    #[must_use]
    pub fn get(&self, action: F::Action) -> Option<&F> {
        self.fields.iter().find(|field| field.action() == action)
    }

    /// Bundles in declared order.
    #[must_use]
    pub fn fields(&self) -> &[F] {
        &self.fields
    }

    /// The set of actions this record carries bundles for.
    #[must_use]
    pub fn actions(&self) -> ActionSet<F::Action> {
        self.fields.iter().map(ActionField::action).collect()
    }

    /// Checks that this record carries bundles for exactly `actions`.
    pub fn check(&self, actions: ActionSet<F::Action>) -> CodecResult<()> {
        for action in actions.iter() {
            if self.get(action).is_none() {
                return Err(CodecError::MissingActionFields {
                    action: action.name(),
                });
            }
        }
        for field in &self.fields {
            if !actions.contains(field.action()) {
                return Err(CodecError::UnexpectedActionFields {
                    action: field.action().name(),
                });
            }
        }
        Ok(())
    }
}

/// A set of actions plus records carrying exactly those actions.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionUpdate<K, F: ActionField> {
    actions: ActionSet<F::Action>,
    records: Vec<ActionRecord<K, F>>,
}

impl<K, F: ActionField> ActionUpdate<K, F> {
    /// Builds an update, checking every record against `actions`.
    pub fn new(actions: ActionSet<F::Action>, records: Vec<ActionRecord<K, F>>) -> CodecResult<Self> {
        for record in &records {
            record.check(actions)?;
        }
        Ok(Self { actions, records })
    }

    /// Builds an update for a single record, taking the record's own actions.
    #[must_use]
    pub fn single(record: ActionRecord<K, F>) -> Self {
        Self {
            actions: record.actions(),
            records: vec![record],
        }
    }

    #[must_use]
    pub const fn actions(&self) -> ActionSet<F::Action> {
        self.actions
    }

    #[must_use]
    pub fn records(&self) -> &[ActionRecord<K, F>] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ActionRecord<K, F>> {
        self.records
    }
}

/// Codec for [`ActionUpdate`] with keys written by `KC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSetCodec<KC> {
    key: KC,
    max_records: usize,
}

impl<KC> ActionSetCodec<KC> {
    #[must_use]
    pub const fn new(key: KC, max_records: usize) -> Self {
        Self { key, max_records }
    }
}

impl<K, F, KC> Codec<ActionUpdate<K, F>> for ActionSetCodec<KC>
where
    F: ActionField,
    KC: Codec<K>,
{
    fn encode(&self, value: &ActionUpdate<K, F>, buf: &mut ByteWriter) -> CodecResult<()> {
        let count = value.records.len();
        let wire_count = u32::try_from(count)
            .ok()
            .filter(|_| count <= self.max_records)
            .ok_or(CodecError::OversizedValue {
                kind: LimitKind::ActionRecords,
                limit: self.max_records,
                actual: count,
            })?;

        buf.write_fixed_bitset(value.actions.bits(), F::Action::WIRE_BITS);
        buf.write_var_u32(wire_count);
        for record in &value.records {
            record.check(value.actions)?;
            self.key.encode(&record.key, buf)?;
            for action in value.actions.iter() {
                let field = record.get(action).ok_or(CodecError::MissingActionFields {
                    action: action.name(),
                })?;
                field.encode_fields(buf)?;
            }
        }
        Ok(())
    }

    fn decode(&self, buf: &mut ByteReader<'_>) -> CodecResult<ActionUpdate<K, F>> {
        let bits = buf.read_fixed_bitset(F::Action::WIRE_BITS)?;
        let actions = ActionSet::from_bits(bits)?;
        let count = buf
            .read_len(self.max_records)
            .map_err(CodecError::bounded(LimitKind::ActionRecords))?;

        let mut records = Vec::with_capacity(count.min(buf.remaining()));
        for _ in 0..count {
            let mut record = ActionRecord::new(self.key.decode(buf)?);
            for action in actions.iter() {
                record.fields.push(F::decode_fields(action, buf)?);
            }
            records.push(record);
        }
        Ok(ActionUpdate { actions, records })
    }
}
