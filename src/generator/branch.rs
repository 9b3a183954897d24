use rand::Rng;

use crate::automata::program::InstPtr;

/// Chooses between the two successors of a branch.
///
/// A fair coin decides which candidate is preferred. The other candidate wins
/// instead when it lies after the most recently visited capture position,
/// which pushes walks forward through the program and out of loops once a
/// group has been passed.
pub fn choose_path<R: Rng + ?Sized>(
    rng: &mut R,
    goto1: InstPtr,
    goto2: InstPtr,
    captures: &[InstPtr],
) -> InstPtr {
    let last = captures.last().copied();
    if rng.gen_bool(0.5) {
        match last {
            Some(last) if goto1 > last => goto1,
            _ => goto2,
        }
    } else {
        match last {
            Some(last) if goto2 > last => goto2,
            _ => goto1,
        }
    }
}
