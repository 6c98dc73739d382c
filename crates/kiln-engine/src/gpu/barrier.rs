use bitflags::bitflags;

bitflags! {
    /// Memory domains a [`super::Renderer::set_memory_barrier`] call orders.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct BarrierMask: u32 {
        const VERTEX_ARRAY = 1 << 0;
        const INDEX_BUFFER = 1 << 1;
        const UNIFORM_BUFFER = 1 << 2;
        const TEXTURE_FETCH = 1 << 3;
        const IMAGE_ACCESS = 1 << 4;
        const COMMAND = 1 << 5;
        const PIXEL_BUFFER = 1 << 6;
        const TEXTURE_UPDATE = 1 << 7;
        const BUFFER_UPDATE = 1 << 8;
        const CLIENT_MAPPED_BUFFER = 1 << 9;
        const FRAMEBUFFER = 1 << 10;
        const TRANSFORM_FEEDBACK = 1 << 11;
        const ATOMIC_COUNTER = 1 << 12;
        const SHADER_STORAGE_BUFFER = 1 << 13;
        const QUERY_BUFFER = 1 << 14;
        const ALL = 1 << 15;
    }
}

// GL_*_BARRIER_BIT values (GL 4.2 / 4.3 / 4.4).
const GL_BITS: [(BarrierMask, u32); 15] = [
    (BarrierMask::VERTEX_ARRAY, 0x0000_0001),
    (BarrierMask::INDEX_BUFFER, 0x0000_0002),
    (BarrierMask::UNIFORM_BUFFER, 0x0000_0004),
    (BarrierMask::TEXTURE_FETCH, 0x0000_0008),
    (BarrierMask::IMAGE_ACCESS, 0x0000_0020),
    (BarrierMask::COMMAND, 0x0000_0040),
    (BarrierMask::PIXEL_BUFFER, 0x0000_0080),
    (BarrierMask::TEXTURE_UPDATE, 0x0000_0100),
    (BarrierMask::BUFFER_UPDATE, 0x0000_0200),
    (BarrierMask::FRAMEBUFFER, 0x0000_0400),
    (BarrierMask::TRANSFORM_FEEDBACK, 0x0000_0800),
    (BarrierMask::ATOMIC_COUNTER, 0x0000_1000),
    (BarrierMask::SHADER_STORAGE_BUFFER, 0x0000_2000),
    (BarrierMask::CLIENT_MAPPED_BUFFER, 0x0000_4000),
    (BarrierMask::QUERY_BUFFER, 0x0000_8000),
];

const GL_ALL_BARRIER_BITS: u32 = 0xFFFF_FFFF;

impl BarrierMask {
    /// OR of the GL barrier bits for every flag in the set.
    pub fn to_gl_bits(self) -> u32 {
        if self.contains(BarrierMask::ALL) {
            return GL_ALL_BARRIER_BITS;
        }
        GL_BITS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .fold(0, |bits, (_, gl)| bits | gl)
    }
}
