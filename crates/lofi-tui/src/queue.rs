//! Skip selection within the playlist.

use lofi_proto::protocol::SkipDirection;
use lofi_proto::track::{position_of, Track};
use rand::Rng;

/// Index reached by moving one step from `current` in `direction`, wrapping
/// at both ends.  `None` when the playlist is empty or `current` is not in it.
pub fn step(playlist: &[Track], current: &Track, direction: SkipDirection) -> Option<usize> {
    let len = playlist.len();
    if len == 0 {
        return None;
    }
    let idx = position_of(playlist, current)?;
    Some(match direction {
        SkipDirection::Next => (idx + 1) % len,
        SkipDirection::Prev => (idx + len - 1) % len,
    })
}

/// Uniform pick over the whole playlist, the current track included.
pub fn pick_shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// The track a skip should move to, or `None` for a no-op.
pub fn skip_target(
    playlist: &[Track],
    current: Option<&Track>,
    direction: SkipDirection,
    shuffle: bool,
) -> Option<Track> {
    let idx = if shuffle {
        pick_shuffled(playlist.len(), &mut rand::thread_rng())?
    } else {
        step(playlist, current?, direction)?
    };
    playlist.get(idx).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn abc() -> Vec<Track> {
        vec![
            Track::new("A", "x").with_id(1i64),
            Track::new("B", "x").with_id(2i64),
            Track::new("C", "x").with_id(3i64),
        ]
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let list = abc();
        assert_eq!(step(&list, &list[1], SkipDirection::Next), Some(2));
        assert_eq!(step(&list, &list[0], SkipDirection::Prev), Some(2));
        assert_eq!(step(&list, &list[2], SkipDirection::Next), Some(0));
    }

    #[test]
    fn test_next_then_prev_returns_to_start() {
        let list = abc();
        for start in 0..list.len() {
            let next = step(&list, &list[start], SkipDirection::Next).unwrap();
            let back = step(&list, &list[next], SkipDirection::Prev).unwrap();
            assert_eq!(back, start);
        }
    }

    #[test]
    fn test_empty_or_unknown_current_is_noop() {
        let list = abc();
        let stranger = Track::new("Z", "x").with_id(99i64);
        assert_eq!(step(&[], &list[0], SkipDirection::Next), None);
        assert_eq!(step(&list, &stranger, SkipDirection::Next), None);
        assert!(skip_target(&[], Some(&list[0]), SkipDirection::Next, false).is_none());
        assert!(skip_target(&[], None, SkipDirection::Next, true).is_none());
        assert!(skip_target(&list, None, SkipDirection::Prev, false).is_none());
    }

    #[test]
    fn test_identity_matches_by_id_not_title() {
        let list = abc();
        // same id, different metadata (e.g. after stream resolution)
        let resolved = Track::new("B (official)", "x")
            .with_id(2i64)
            .with_url("https://cdn/b.m4a");
        let target = skip_target(&list, Some(&resolved), SkipDirection::Next, false).unwrap();
        assert_eq!(target.title, "C");
    }

    #[test]
    fn test_shuffle_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let idx = pick_shuffled(3, &mut rng).unwrap();
            assert!(idx < 3);
        }
        assert_eq!(pick_shuffled(0, &mut rng), None);

        let list = abc();
        let picked = skip_target(&list, None, SkipDirection::Next, true).unwrap();
        assert!(list.iter().any(|t| t.same_as(&picked)));
    }
}
