//! Fixed-size partitioning of the enumerated file list.

use std::num::NonZeroUsize;

/// A consecutive window of the enumerated files rendered into one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a, T> {
    part: usize,
    items: &'a [T],
}

impl<'a, T> Chunk<'a, T> {
    /// 1-based part number of the document built from this chunk.
    pub fn part(&self) -> usize {
        self.part
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Splits `items` into consecutive, non-overlapping chunks of `size` elements.
///
/// The last chunk holds the remainder. An empty input produces no chunks at all.
pub fn partition<T>(items: &[T], size: NonZeroUsize) -> impl Iterator<Item = Chunk<'_, T>> {
    items
        .chunks(size.get())
        .enumerate()
        .map(|(index, items)| Chunk {
            part: index + 1,
            items,
        })
}

/// Number of chunks [`partition`] produces for `len` items.
pub fn chunk_count(len: usize, size: NonZeroUsize) -> usize {
    len.div_ceil(size.get())
}

/// File name of the document for `part`, e.g. `ProyectoParte_3.pdf`.
pub fn output_file_name(prefix: &str, part: usize) -> String {
    format!("{prefix}_{part}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero chunk size")
    }

    #[test]
    fn chunks_cover_input_in_order() {
        for len in 0..64usize {
            let items: Vec<usize> = (0..len).collect();
            for chunk_size in 1..24usize {
                let chunks: Vec<_> = partition(&items, size(chunk_size)).collect();

                assert_eq!(chunks.len(), chunk_count(len, size(chunk_size)));
                assert_eq!(chunks.len(), (len + chunk_size - 1) / chunk_size);

                for (index, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.part(), index + 1);
                    if index + 1 < chunks.len() {
                        assert_eq!(chunk.len(), chunk_size);
                    }
                }

                if let Some(last) = chunks.last() {
                    let expected = match len % chunk_size {
                        0 => chunk_size,
                        rest => rest,
                    };
                    assert_eq!(last.len(), expected);
                }

                let rejoined: Vec<usize> = chunks
                    .iter()
                    .flat_map(|chunk| chunk.items().iter().copied())
                    .collect();
                assert_eq!(rejoined, items);
            }
        }
    }

    #[test]
    fn empty_input_produces_no_chunks() {
        let items: Vec<u8> = Vec::new();
        assert_eq!(partition(&items, size(20)).count(), 0);
    }

    #[test]
    fn one_past_chunk_size_splits_in_two() {
        let items: Vec<usize> = (0..21).collect();
        let chunks: Vec<_> = partition(&items, size(20)).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 20);
        assert_eq!(chunks[1].items(), &[20]);
        assert_eq!(chunks[1].part(), 2);
    }

    #[test]
    fn output_names_use_prefix_and_part() {
        assert_eq!(output_file_name("ProyectoParte", 1), "ProyectoParte_1.pdf");
        assert_eq!(output_file_name("snap", 12), "snap_12.pdf");
    }
}
